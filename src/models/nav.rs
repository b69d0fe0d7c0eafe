use crate::auth::session::Permissions;

pub struct NavItem {
    pub label: &'static str,
    pub url: &'static str,
    pub is_active: bool,
}

/// The module navigation: label, url, and the permission that gates it.
const NAV: [(&str, &str, &str); 6] = [
    ("Dashboard", "/dashboard", "dashboard.view"),
    ("Customers", "/customers", "customers.view"),
    ("Appointments", "/appointments", "appointments.view"),
    ("Financial", "/financial", "financial.view"),
    ("Users", "/users", "users.view"),
    ("Audit", "/audit", "audit.view"),
];

/// Build the header navigation for the current user and path. Items the
/// actor lacks permission for are hidden entirely.
pub fn build(permissions: &Permissions, current_path: &str) -> Vec<NavItem> {
    NAV.iter()
        .filter(|(_, _, permission)| permissions.has(permission))
        .map(|(label, url, _)| NavItem {
            label,
            url,
            is_active: current_path == *url || current_path.starts_with(&format!("{url}/")),
        })
        .collect()
}
