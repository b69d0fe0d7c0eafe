use sqlx::PgPool;

use crate::errors::AppError;

/// A named capability: `{name, description, module, action}`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub module: String,
    pub action: String,
}

/// Effective permission set for a user: the union of permissions over all
/// roles held, deduplicated and ordered by name.
pub async fn find_by_user_id(pool: &PgPool, user_id: i64) -> Result<Vec<Permission>, AppError> {
    let perms = sqlx::query_as::<_, Permission>(
        "SELECT DISTINCT p.id, p.name, p.description, p.module, p.action \
         FROM permissions p \
         JOIN role_permissions rp ON rp.permission_id = p.id \
         JOIN user_roles ur ON ur.role = rp.role \
         WHERE ur.user_id = $1 AND p.is_active \
         ORDER BY p.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(perms)
}

/// Permission names only, for the session CSV.
pub async fn find_names_by_user_id(pool: &PgPool, user_id: i64) -> Result<Vec<String>, AppError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT p.name \
         FROM permissions p \
         JOIN role_permissions rp ON rp.permission_id = p.id \
         JOIN user_roles ur ON ur.role = rp.role \
         WHERE ur.user_id = $1 AND p.is_active \
         ORDER BY p.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

