use std::collections::HashMap;

use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::{get_user_id, require_permission};
use crate::errors::{AppError, render};
use crate::models::setting;
use crate::templates_structs::{PageContext, SettingsTemplate};

pub async fn list(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    require_permission(&session, "settings.edit")?;
    let ctx = PageContext::build(&session, &pool, "/settings").await?;
    let settings = setting::find_all(&pool).await?;
    render(SettingsTemplate { ctx, settings })
}

/// Save posted settings. Fields are named `value_<id>`; anything else
/// (except the CSRF token) is ignored.
pub async fn save(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "settings.edit")?;
    let token = form.get("csrf_token").cloned().unwrap_or_default();
    csrf::validate_csrf(&session, &token)?;

    for (key, value) in form.iter() {
        let Some(id) = key.strip_prefix("value_").and_then(|s| s.parse::<i64>().ok()) else {
            continue;
        };
        setting::update_value(&pool, id, value.trim()).await?;
    }

    let user_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        user_id,
        "update",
        "settings",
        0,
        serde_json::json!({}),
    )
    .await;

    let _ = session.insert("flash", "Settings saved");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/settings"))
        .finish())
}
