use std::fmt;

/// The closed role enumeration. Role strings in the database and in forms
/// parse against this exactly; anything else (unknown names, case
/// variants) is rejected rather than carried around as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Manager,
    Technician,
    Finance,
    Salesperson,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::Technician,
        Role::Finance,
        Role::Salesperson,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Technician => "technician",
            Role::Finance => "finance",
            Role::Salesperson => "salesperson",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Manager => "Manager",
            Role::Technician => "Technician",
            Role::Finance => "Finance",
            Role::Salesperson => "Salesperson",
        }
    }

    /// Exact-match parse; `None` for anything outside the enumeration.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "technician" => Some(Role::Technician),
            "finance" => Some(Role::Finance),
            "salesperson" => Some(Role::Salesperson),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
