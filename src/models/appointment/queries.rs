use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::types::{AppointmentDetail, AppointmentListItem, AppointmentStatus};
use crate::errors::AppError;
use crate::models::task::TaskList;

#[derive(sqlx::FromRow)]
struct ListRow {
    id: i64,
    customer_name: String,
    technician_name: String,
    service_type_name: String,
    start_time: String,
    end_time: String,
    status: String,
    tasks: serde_json::Value,
}

const LIST_SELECT: &str = "\
    SELECT a.id, \
           c.full_name AS customer_name, \
           t.full_name AS technician_name, \
           st.name AS service_type_name, \
           to_char(a.start_time, 'YYYY-MM-DD HH24:MI') AS start_time, \
           to_char(a.end_time, 'YYYY-MM-DD HH24:MI') AS end_time, \
           a.status, a.tasks \
    FROM appointments a \
    JOIN customers c ON c.id = a.customer_id \
    JOIN technicians t ON t.id = a.technician_id \
    JOIN service_types st ON st.id = a.service_type_id";

fn map_list_row(row: ListRow) -> AppointmentListItem {
    let tasks = TaskList::from_value(&row.tasks);
    let status_label = AppointmentStatus::parse(&row.status)
        .map(|s| s.label())
        .unwrap_or("Unknown");
    AppointmentListItem {
        id: row.id,
        customer_name: row.customer_name,
        technician_name: row.technician_name,
        service_type_name: row.service_type_name,
        start_time: row.start_time,
        end_time: row.end_time,
        status: row.status,
        status_label: status_label.to_string(),
        task_count: tasks.len(),
        completed_tasks: tasks.completed_count(),
        progress_percent: tasks.progress_percent(),
    }
}

/// Upcoming appointments from a cutoff, soonest first.
pub async fn find_upcoming(
    pool: &PgPool,
    from: DateTime<Utc>,
) -> Result<Vec<AppointmentListItem>, AppError> {
    let sql = format!("{LIST_SELECT} WHERE a.start_time >= $1 ORDER BY a.start_time ASC");
    let rows = sqlx::query_as::<_, ListRow>(&sql)
        .bind(from)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(map_list_row).collect())
}

/// Past appointments before a cutoff, most recent first.
pub async fn find_past(
    pool: &PgPool,
    before: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<AppointmentListItem>, AppError> {
    let sql = format!("{LIST_SELECT} WHERE a.start_time < $1 ORDER BY a.start_time DESC LIMIT $2");
    let rows = sqlx::query_as::<_, ListRow>(&sql)
        .bind(before)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(map_list_row).collect())
}

#[derive(sqlx::FromRow)]
struct DetailRow {
    id: i64,
    customer_id: i64,
    customer_name: String,
    technician_id: i64,
    technician_name: String,
    service_type_id: i64,
    service_type_name: String,
    start_time: String,
    end_time: String,
    status: String,
    observations: String,
    tasks: serde_json::Value,
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<AppointmentDetail>, AppError> {
    let row = sqlx::query_as::<_, DetailRow>(
        "SELECT a.id, a.customer_id, c.full_name AS customer_name, \
                a.technician_id, t.full_name AS technician_name, \
                a.service_type_id, st.name AS service_type_name, \
                to_char(a.start_time, 'YYYY-MM-DD\"T\"HH24:MI') AS start_time, \
                to_char(a.end_time, 'YYYY-MM-DD\"T\"HH24:MI') AS end_time, \
                a.status, a.observations, a.tasks \
         FROM appointments a \
         JOIN customers c ON c.id = a.customer_id \
         JOIN technicians t ON t.id = a.technician_id \
         JOIN service_types st ON st.id = a.service_type_id \
         WHERE a.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| AppointmentDetail {
        id: r.id,
        customer_id: r.customer_id,
        customer_name: r.customer_name,
        technician_id: r.technician_id,
        technician_name: r.technician_name,
        service_type_id: r.service_type_id,
        service_type_name: r.service_type_name,
        start_time: r.start_time,
        end_time: r.end_time,
        status: AppointmentStatus::parse(&r.status).unwrap_or(AppointmentStatus::Scheduled),
        observations: r.observations,
        tasks: TaskList::from_value(&r.tasks),
    }))
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    customer_id: i64,
    technician_id: i64,
    service_type_id: i64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    observations: &str,
    tasks: &TaskList,
    created_by: i64,
) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO appointments \
             (customer_id, technician_id, service_type_id, start_time, end_time, \
              observations, tasks, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(customer_id)
    .bind(technician_id)
    .bind(service_type_id)
    .bind(start_time)
    .bind(end_time)
    .bind(observations.trim())
    .bind(tasks.to_value())
    .bind(created_by)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &PgPool,
    id: i64,
    customer_id: i64,
    technician_id: i64,
    service_type_id: i64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: AppointmentStatus,
    observations: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE appointments SET \
             customer_id = $1, technician_id = $2, service_type_id = $3, \
             start_time = $4, end_time = $5, status = $6, observations = $7, \
             updated_at = now() \
         WHERE id = $8",
    )
    .bind(customer_id)
    .bind(technician_id)
    .bind(service_type_id)
    .bind(start_time)
    .bind(end_time)
    .bind(status.as_str())
    .bind(observations.trim())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Persist the whole task list back onto the appointment row (last write
/// wins).
pub async fn update_tasks(pool: &PgPool, id: i64, tasks: &TaskList) -> Result<(), AppError> {
    sqlx::query("UPDATE appointments SET tasks = $1, updated_at = now() WHERE id = $2")
        .bind(tasks.to_value())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM appointments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Count of appointments not yet completed or cancelled (dashboard).
pub async fn count_open(pool: &PgPool) -> Result<i64, AppError> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM appointments WHERE status NOT IN ('completed', 'cancelled')",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}
