use sqlx::PgPool;

use super::types::{ServiceTemplate, TemplateListItem};
use crate::errors::AppError;
use crate::models::task::TaskSkeleton;

/// Decode a template's skeleton blob. Malformed entries degrade to an
/// empty list with an advisory log, mirroring the task-blob boundary.
fn decode_skeletons(value: serde_json::Value) -> Vec<TaskSkeleton> {
    match serde_json::from_value(value) {
        Ok(skeletons) => skeletons,
        Err(e) => {
            log::warn!("Malformed template task blob, treating as empty: {e}");
            Vec::new()
        }
    }
}

/// Active templates for one service type, ordered by name.
pub async fn find_by_service_type(
    pool: &PgPool,
    service_type_id: i64,
) -> Result<Vec<TemplateListItem>, AppError> {
    let rows: Vec<(i64, String, String, serde_json::Value, i64)> = sqlx::query_as(
        "SELECT id, name, description, default_tasks, estimated_duration \
         FROM service_templates \
         WHERE service_type_id = $1 AND is_active \
         ORDER BY name",
    )
    .bind(service_type_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, description, tasks, estimated_duration)| TemplateListItem {
            id,
            name,
            description,
            task_count: decode_skeletons(tasks).len() as i64,
            estimated_duration,
        })
        .collect())
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ServiceTemplate>, AppError> {
    let row: Option<(i64, String, String, i64, i64, serde_json::Value)> = sqlx::query_as(
        "SELECT id, name, description, service_type_id, estimated_duration, default_tasks \
         FROM service_templates WHERE id = $1 AND is_active",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(id, name, description, service_type_id, estimated_duration, tasks)| ServiceTemplate {
            id,
            name,
            description,
            service_type_id,
            estimated_duration,
            default_tasks: decode_skeletons(tasks),
        },
    ))
}

