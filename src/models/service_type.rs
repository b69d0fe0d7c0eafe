use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceType {
    pub id: i64,
    pub name: String,
    pub estimated_duration: i64,
    pub price_cents: i64,
    pub is_active: bool,
}

/// Active service types for scheduling dropdowns, ordered by name.
pub async fn find_active(pool: &PgPool) -> Result<Vec<ServiceType>, AppError> {
    let types = sqlx::query_as::<_, ServiceType>(
        "SELECT id, name, estimated_duration, price_cents, is_active \
         FROM service_types WHERE is_active ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(types)
}
