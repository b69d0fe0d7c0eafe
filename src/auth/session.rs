use actix_session::Session;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::role::Role;
use crate::models::{permission, user};

/// Wrapper around permission names with a `has()` method for use in Askama
/// templates and handler guards.
#[derive(Debug, Clone, Default)]
pub struct Permissions(pub Vec<String>);

impl Permissions {
    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|p| p == name)
    }

    pub fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.has(n))
    }

    pub fn from_csv(csv: &str) -> Self {
        let names = csv
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Permissions(names)
    }

    pub fn to_csv(&self) -> String {
        self.0.join(",")
    }
}

/// The set of roles held by the signed-in actor. Unknown role strings are
/// dropped at parse time, so membership checks are always against the
/// closed enumeration.
#[derive(Debug, Clone, Default)]
pub struct Roles(pub Vec<Role>);

impl Roles {
    pub fn has(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has(*r))
    }

    pub fn from_csv(csv: &str) -> Self {
        let roles = csv
            .split(',')
            .filter_map(|s| Role::parse(s.trim()))
            .collect();
        Roles(roles)
    }

    pub fn to_csv(&self) -> String {
        self.0
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Result<String, String> {
    match session.get::<String>("username") {
        Ok(Some(username)) => Ok(username),
        Ok(None) => Err("No username in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

pub fn get_permissions(session: &Session) -> Result<Permissions, String> {
    match session.get::<String>("permissions") {
        Ok(Some(csv)) => Ok(Permissions::from_csv(&csv)),
        Ok(None) => Err("No permissions in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

pub fn get_roles(session: &Session) -> Result<Roles, String> {
    match session.get::<String>("roles") {
        Ok(Some(csv)) => Ok(Roles::from_csv(&csv)),
        Ok(None) => Err("No roles in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

/// Check permission; returns Err(AppError) if denied.
pub fn require_permission(session: &Session, name: &str) -> Result<(), AppError> {
    let permissions = get_permissions(session)
        .map_err(|e| AppError::Session(format!("Failed to get permissions: {}", e)))?;

    if permissions.has(name) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(name.to_string()))
    }
}

/// Check role membership against any of the given roles.
pub fn require_any_role(session: &Session, roles: &[Role]) -> Result<(), AppError> {
    let held = get_roles(session)
        .map_err(|e| AppError::Session(format!("Failed to get roles: {}", e)))?;

    if held.has_any(roles) {
        Ok(())
    } else {
        let wanted = roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join("|");
        Err(AppError::PermissionDenied(format!("role:{wanted}")))
    }
}

/// Re-resolve the actor's roles and effective permission set and rewrite
/// them into the session. Called at sign-in and after role assignment
/// changes; repeatable, and a no-op when the underlying mapping is
/// unchanged. Resolution failure degrades to the empty set (fail-closed)
/// so gated UI renders "no access" instead of erroring.
pub async fn refresh_auth(pool: &PgPool, session: &Session, user_id: i64) {
    let roles = match user::find_roles_by_user_id(pool, user_id).await {
        Ok(roles) => Roles(roles),
        Err(e) => {
            log::warn!("Role resolution failed for user {user_id}: {e}");
            Roles::default()
        }
    };
    let permissions = match permission::find_names_by_user_id(pool, user_id).await {
        Ok(names) => Permissions(names),
        Err(e) => {
            log::warn!("Permission resolution failed for user {user_id}: {e}");
            Permissions::default()
        }
    };

    let _ = session.insert("roles", roles.to_csv());
    let _ = session.insert("permissions", permissions.to_csv());
}
