use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Technician {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub is_active: bool,
}

/// Active technicians for assignment dropdowns, ordered by name.
pub async fn find_active(pool: &PgPool) -> Result<Vec<Technician>, AppError> {
    let technicians = sqlx::query_as::<_, Technician>(
        "SELECT id, full_name, phone, is_active \
         FROM technicians WHERE is_active ORDER BY full_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(technicians)
}
