use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::require_permission;
use crate::errors::{AppError, render};
use crate::models::audit;
use crate::templates_structs::{AuditListTemplate, PageContext};

#[derive(Deserialize)]
pub struct AuditQuery {
    page: Option<i64>,
    per_page: Option<i64>,
    q: Option<String>,
    action: Option<String>,
    table: Option<String>,
}

pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<AuditQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "audit.view")?;
    let ctx = PageContext::build(&session, &pool, "/audit").await?;

    // A failed lookup degrades to an empty page rather than an error.
    let audit_page = audit::find_paginated(
        &pool,
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(25),
        query.q.as_deref(),
        query.action.as_deref(),
        query.table.as_deref(),
    )
    .await
    .unwrap_or_else(|e| {
        log::warn!("Audit lookup failed: {e}");
        audit::AuditEntryPage {
            entries: vec![],
            page: 1,
            per_page: 25,
            total_count: 0,
            total_pages: 0,
        }
    });

    let table_names = audit::find_table_names(&pool).await.unwrap_or_default();

    render(AuditListTemplate {
        ctx,
        audit_page,
        search_query: query.q.clone(),
        action_filter: query.action.clone(),
        table_filter: query.table.clone(),
        table_names,
    })
}
