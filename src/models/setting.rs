use sqlx::PgPool;

use crate::errors::AppError;

/// A setting for display and editing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettingDisplay {
    pub id: i64,
    pub name: String,
    pub label: String,
    pub value: String,
    pub description: String,
}

/// Find all settings, ordered by name.
pub async fn find_all(pool: &PgPool) -> Result<Vec<SettingDisplay>, AppError> {
    let settings = sqlx::query_as::<_, SettingDisplay>(
        "SELECT id, name, label, value, description FROM settings ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(settings)
}

/// Get a single setting's value by name, returning a default if not found.
pub async fn get_value(pool: &PgPool, name: &str, default: &str) -> String {
    let row: Result<Option<(String,)>, _> =
        sqlx::query_as("SELECT value FROM settings WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await;
    match row {
        Ok(Some((value,))) => value,
        _ => default.to_string(),
    }
}

/// Update a single setting's value by id.
pub async fn update_value(pool: &PgPool, id: i64, value: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE settings SET value = $1 WHERE id = $2")
        .bind(value)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
