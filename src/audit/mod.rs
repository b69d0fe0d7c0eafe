//! Fail-soft audit trail. Mutating handlers record what happened; a
//! failure to write the trail is logged and never fails the request.

use sqlx::PgPool;

use crate::models::{audit, setting};

/// Record an action against the audit log. Errors are swallowed after a
/// warning so auditing never breaks the mutation it describes.
pub async fn log(
    pool: &PgPool,
    user_id: i64,
    action: &str,
    table_name: &str,
    record_id: i64,
    details: serde_json::Value,
) {
    let record_id = (record_id != 0).then_some(record_id);
    if let Err(e) = audit::create(
        pool,
        user_id,
        action,
        table_name,
        record_id,
        None,
        Some(details),
        "",
        "",
    )
    .await
    {
        log::warn!("Audit write failed for {action}: {e}");
    }
}

/// Prune audit entries older than the `audit.retention_days` setting.
/// Called once at startup.
pub async fn cleanup_old_entries(pool: &PgPool) {
    let days: i64 = setting::get_value(pool, "audit.retention_days", "90")
        .await
        .parse()
        .unwrap_or(90);
    match audit::delete_older_than_days(pool, days).await {
        Ok(0) => {}
        Ok(n) => log::info!("Pruned {n} audit entries older than {days} days"),
        Err(e) => log::warn!("Audit cleanup failed: {e}"),
    }
}
