use std::collections::HashMap;

use sqlx::PgPool;

use super::types::{NewUser, User, UserDisplay, UserPage};
use crate::errors::AppError;
use crate::models::role::Role;

/// Find user by email for authentication. Returns internal User with
/// password hash.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, full_name, is_active \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, full_name, is_active \
         FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    full_name: String,
    is_active: bool,
    created_at: String,
}

/// Paginated user list with resolved role sets. Unknown role strings in
/// the database are dropped at parse time.
pub async fn find_paginated(
    pool: &PgPool,
    page: i64,
    per_page: i64,
    search: Option<&str>,
) -> Result<UserPage, AppError> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;
    let pattern = format!("%{}%", search.unwrap_or("").trim());

    let (total_count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM users \
         WHERE full_name ILIKE $1 OR email ILIKE $1",
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, full_name, is_active, \
                to_char(created_at, 'YYYY-MM-DD') AS created_at \
         FROM users \
         WHERE full_name ILIKE $1 OR email ILIKE $1 \
         ORDER BY full_name, id \
         LIMIT $2 OFFSET $3",
    )
    .bind(&pattern)
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let role_rows: Vec<(i64, String)> = sqlx::query_as(
        "SELECT user_id, role FROM user_roles WHERE user_id = ANY($1) ORDER BY role",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut roles_by_user: HashMap<i64, Vec<Role>> = HashMap::new();
    for (user_id, role) in role_rows {
        if let Some(role) = Role::parse(&role) {
            roles_by_user.entry(user_id).or_default().push(role);
        }
    }

    let users = rows
        .into_iter()
        .map(|r| UserDisplay {
            roles: roles_by_user.remove(&r.id).unwrap_or_default(),
            id: r.id,
            email: r.email,
            full_name: r.full_name,
            is_active: r.is_active,
            created_at: r.created_at,
        })
        .collect();

    let total_pages = (total_count as f64 / per_page as f64).ceil() as i64;
    Ok(UserPage {
        users,
        page,
        per_page,
        total_count,
        total_pages,
    })
}

/// All roles held by a user, parsed against the closed enumeration.
pub async fn find_roles_by_user_id(pool: &PgPool, user_id: i64) -> Result<Vec<Role>, AppError> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role")
            .bind(user_id)
            .fetch_all(pool)
            .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(role,)| Role::parse(&role))
        .collect())
}

pub async fn assign_role(pool: &PgPool, user_id: i64, role: Role) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO user_roles (user_id, role) VALUES ($1, $2) \
         ON CONFLICT (user_id, role) DO NOTHING",
    )
    .bind(user_id)
    .bind(role.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn revoke_role(pool: &PgPool, user_id: i64, role: Role) -> Result<(), AppError> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role = $2")
        .bind(user_id)
        .bind(role.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn create(pool: &PgPool, new: &NewUser) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (email, password_hash, full_name) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(&new.full_name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn set_active(pool: &PgPool, id: i64, is_active: bool) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET is_active = $1, updated_at = now() WHERE id = $2")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_password(pool: &PgPool, id: i64, password_hash: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count(pool: &PgPool) -> Result<i64, AppError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
