use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::errors::{AppError, render};
use crate::models::{audit, dashboard};
use crate::templates_structs::{DashboardTemplate, PageContext};

pub async fn index(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &pool, "/dashboard").await?;

    let stats = dashboard::load_stats(&pool, &ctx.permissions).await;

    let recent_activity = if ctx.permissions.has("audit.view") {
        audit::find_recent(&pool, 10).await.unwrap_or_default()
    } else {
        Vec::new()
    };

    render(DashboardTemplate {
        ctx,
        stats,
        recent_activity,
    })
}
