use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::get_user_id;
use crate::auth::{csrf, password, validate};
use crate::errors::{AppError, render};
use crate::models::{permission, user};
use crate::templates_structs::{AccountTemplate, PageContext};

/// Resolved permission list for the account page; a lookup failure
/// degrades to an empty set (fail-closed) instead of erroring.
async fn load_permissions(
    pool: &PgPool,
    user_id: i64,
) -> Vec<crate::models::permission::Permission> {
    permission::find_by_user_id(pool, user_id)
        .await
        .unwrap_or_else(|e| {
            log::warn!("Permission resolution failed for user {user_id}: {e}");
            Vec::new()
        })
}

pub async fn form(pool: web::Data<PgPool>, session: Session) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &pool, "/account").await?;
    let user_id = get_user_id(&session).unwrap_or(0);
    let permissions = load_permissions(&pool, user_id).await;
    render(AccountTemplate {
        ctx,
        errors: Vec::new(),
        permissions,
    })
}

#[derive(Deserialize)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub csrf_token: String,
}

pub async fn submit(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<PasswordForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let user_id = get_user_id(&session)
        .ok_or_else(|| AppError::Session("Not authenticated".to_string()))?;
    let current = user::find_by_id(&pool, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut errors = Vec::new();
    match password::verify_password(&form.current_password, &current.password_hash) {
        Ok(true) => {}
        _ => errors.push("Current password is incorrect".to_string()),
    }
    if let Some(e) = validate::validate_password(&form.new_password) {
        errors.push(e);
    }
    if form.new_password != form.confirm_password {
        errors.push("Password confirmation does not match".to_string());
    }

    if !errors.is_empty() {
        let ctx = PageContext::build(&session, &pool, "/account").await?;
        let permissions = load_permissions(&pool, user_id).await;
        return render(AccountTemplate {
            ctx,
            errors,
            permissions,
        });
    }

    let hash = password::hash_password(&form.new_password).map_err(AppError::Hash)?;
    user::update_password(&pool, user_id, &hash).await?;

    crate::audit::log(
        &pool,
        user_id,
        "password.change",
        "users",
        user_id,
        serde_json::json!({}),
    )
    .await;

    let _ = session.insert("flash", "Password updated");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/account"))
        .finish())
}
