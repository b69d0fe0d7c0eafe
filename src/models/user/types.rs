use serde::Deserialize;

use crate::models::role::Role;

/// Internal user struct for authentication — includes password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub is_active: bool,
}

/// Safe version for templates — no password hash, roles resolved.
#[derive(Debug, Clone)]
pub struct UserDisplay {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub roles: Vec<Role>,
    pub created_at: String,
}

/// Pagination metadata for the user list.
pub struct UserPage {
    pub users: Vec<UserDisplay>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// New user data for creation.
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
}

/// Form data from the create user form.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub csrf_token: String,
}
