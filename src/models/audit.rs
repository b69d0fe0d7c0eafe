use sqlx::PgPool;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub action: String,
    pub table_name: String,
    pub record_id: i64,
    pub details: String,
    pub created_at: String,
}

pub struct AuditEntryPage {
    pub entries: Vec<AuditEntry>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: i64,
    user_id: i64,
    username: String,
    action: String,
    table_name: String,
    record_id: i64,
    new_values: Option<serde_json::Value>,
    created_at: String,
}

fn map_row(r: AuditRow) -> AuditEntry {
    AuditEntry {
        id: r.id,
        user_id: r.user_id,
        username: r.username,
        action: r.action,
        table_name: r.table_name,
        record_id: r.record_id,
        details: r.new_values.map(|v| v.to_string()).unwrap_or_default(),
        created_at: r.created_at,
    }
}

const SELECT_AUDIT: &str = "\
    SELECT a.id, \
           COALESCE(a.user_id, 0) AS user_id, \
           COALESCE(u.full_name, 'unknown') AS username, \
           a.action, a.table_name, \
           COALESCE(a.record_id, 0) AS record_id, \
           a.new_values, \
           to_char(a.created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at \
    FROM audit_logs a \
    LEFT JOIN users u ON u.id = a.user_id";

const AUDIT_FILTER: &str = "\
    ($1 = '' OR u.full_name ILIKE '%' || $1 || '%' \
             OR a.action ILIKE '%' || $1 || '%' \
             OR a.table_name ILIKE '%' || $1 || '%') \
    AND ($2 = '' OR a.action LIKE $2 || '%') \
    AND ($3 = '' OR a.table_name = $3)";

/// Find audit entries with pagination and optional filters. Filter values
/// of "all" (from the select widgets) are treated as no filter.
pub async fn find_paginated(
    pool: &PgPool,
    page: i64,
    per_page: i64,
    search: Option<&str>,
    action_filter: Option<&str>,
    table_filter: Option<&str>,
) -> Result<AuditEntryPage, AppError> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;

    let search = search.unwrap_or("").trim();
    let action = action_filter.filter(|a| *a != "all").unwrap_or("").trim();
    let table = table_filter.filter(|t| *t != "all").unwrap_or("").trim();

    let count_sql = format!(
        "SELECT COUNT(*) FROM audit_logs a \
         LEFT JOIN users u ON u.id = a.user_id \
         WHERE {AUDIT_FILTER}"
    );
    let (total_count,): (i64,) = sqlx::query_as(&count_sql)
        .bind(search)
        .bind(action)
        .bind(table)
        .fetch_one(pool)
        .await?;

    let data_sql = format!(
        "{SELECT_AUDIT} WHERE {AUDIT_FILTER} \
         ORDER BY a.created_at DESC LIMIT $4 OFFSET $5"
    );
    let rows = sqlx::query_as::<_, AuditRow>(&data_sql)
        .bind(search)
        .bind(action)
        .bind(table)
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let total_pages = (total_count as f64 / per_page as f64).ceil() as i64;
    Ok(AuditEntryPage {
        entries: rows.into_iter().map(map_row).collect(),
        page,
        per_page,
        total_count,
        total_pages,
    })
}

/// Fetch the N most recent audit entries (for the dashboard activity feed).
pub async fn find_recent(pool: &PgPool, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
    let sql = format!("{SELECT_AUDIT} ORDER BY a.created_at DESC LIMIT $1");
    let rows = sqlx::query_as::<_, AuditRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(map_row).collect())
}

/// Distinct table names seen in the log, for the filter dropdown.
pub async fn find_table_names(pool: &PgPool) -> Result<Vec<String>, AppError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT table_name FROM audit_logs \
         WHERE table_name <> '' ORDER BY table_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Insert an audit row.
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    user_id: i64,
    action: &str,
    table_name: &str,
    record_id: Option<i64>,
    old_values: Option<serde_json::Value>,
    new_values: Option<serde_json::Value>,
    ip_address: &str,
    user_agent: &str,
) -> Result<i64, AppError> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO audit_logs \
             (user_id, action, table_name, record_id, old_values, new_values, \
              ip_address, user_agent) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(user_id)
    .bind(action)
    .bind(table_name)
    .bind(record_id)
    .bind(old_values)
    .bind(new_values)
    .bind(ip_address)
    .bind(user_agent)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Delete entries older than the retention window. Returns rows removed.
pub async fn delete_older_than_days(pool: &PgPool, days: i64) -> Result<u64, AppError> {
    let result = sqlx::query(
        "DELETE FROM audit_logs WHERE created_at < now() - make_interval(days => $1::int)",
    )
    .bind(days)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
