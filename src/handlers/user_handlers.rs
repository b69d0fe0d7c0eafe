use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{get_user_id, refresh_auth, require_any_role, require_permission};
use crate::auth::{csrf, password, validate};
use crate::errors::{AppError, render};
use crate::models::role::Role;
use crate::models::user::{self, NewUser, UserForm};
use crate::templates_structs::{PageContext, UserListTemplate, user::UserFormTemplate};

#[derive(Deserialize)]
pub struct UserQuery {
    page: Option<i64>,
    q: Option<String>,
}

pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "users.view")?;
    let ctx = PageContext::build(&session, &pool, "/users").await?;

    let user_page =
        user::find_paginated(&pool, query.page.unwrap_or(1), 25, query.q.as_deref()).await?;

    render(UserListTemplate {
        ctx,
        user_page,
        all_roles: Role::ALL.to_vec(),
        search_query: query.q.clone(),
    })
}

pub async fn new_form(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_any_role(&session, &[Role::Admin])?;
    let ctx = PageContext::build(&session, &pool, "/users").await?;
    render(UserFormTemplate {
        ctx,
        errors: Vec::new(),
    })
}

pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<UserForm>,
) -> Result<HttpResponse, AppError> {
    require_any_role(&session, &[Role::Admin])?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors = Vec::new();
    if let Some(e) = validate::validate_email(&form.email) {
        errors.push(e);
    }
    if let Some(e) = validate::validate_password(&form.password) {
        errors.push(e);
    }
    if let Some(e) = validate::validate_required(&form.full_name, "Full name", 200) {
        errors.push(e);
    }
    if errors.is_empty() && user::find_by_email(&pool, form.email.trim()).await?.is_some() {
        errors.push("A user with this email already exists".to_string());
    }
    if !errors.is_empty() {
        let ctx = PageContext::build(&session, &pool, "/users").await?;
        return render(UserFormTemplate { ctx, errors });
    }

    let password_hash =
        password::hash_password(&form.password).map_err(AppError::Hash)?;
    let id = user::create(
        &pool,
        &NewUser {
            email: form.email.trim().to_string(),
            password_hash,
            full_name: form.full_name.trim().to_string(),
        },
    )
    .await?;

    let actor_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        actor_id,
        "create",
        "users",
        id,
        serde_json::json!({ "email": form.email.trim() }),
    )
    .await;

    let _ = session.insert("flash", "User created successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/users"))
        .finish())
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub async fn toggle_active(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_any_role(&session, &[Role::Admin])?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let actor_id = get_user_id(&session).unwrap_or(0);
    if id == actor_id {
        let _ = session.insert("flash", "You cannot deactivate your own account");
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/users"))
            .finish());
    }

    let target = user::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    user::set_active(&pool, id, !target.is_active).await?;

    let action = if target.is_active { "deactivate" } else { "activate" };
    crate::audit::log(
        &pool,
        actor_id,
        action,
        "users",
        id,
        serde_json::json!({ "email": target.email }),
    )
    .await;

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/users"))
        .finish())
}

#[derive(Deserialize)]
pub struct RoleForm {
    pub role: String,
    pub csrf_token: String,
}

pub async fn assign_role(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<RoleForm>,
) -> Result<HttpResponse, AppError> {
    require_any_role(&session, &[Role::Admin])?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Only values from the closed enumeration are assignable.
    let role = Role::parse(&form.role)
        .ok_or_else(|| AppError::Validation("Unknown role".to_string()))?;

    let id = path.into_inner();
    user::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    user::assign_role(&pool, id, role).await?;

    let actor_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        actor_id,
        "role.assign",
        "user_roles",
        id,
        serde_json::json!({ "role": role.as_str() }),
    )
    .await;

    // Self-modification takes effect in this session immediately; other
    // users pick the change up at their next sign-in.
    if id == actor_id {
        refresh_auth(&pool, &session, actor_id).await;
    }

    let _ = session.insert("flash", format!("Role {} assigned", role.label()));
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/users"))
        .finish())
}

pub async fn revoke_role(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<RoleForm>,
) -> Result<HttpResponse, AppError> {
    require_any_role(&session, &[Role::Admin])?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let role = Role::parse(&form.role)
        .ok_or_else(|| AppError::Validation("Unknown role".to_string()))?;

    let id = path.into_inner();
    let actor_id = get_user_id(&session).unwrap_or(0);
    if id == actor_id && role == Role::Admin {
        let _ = session.insert("flash", "You cannot revoke your own admin role");
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/users"))
            .finish());
    }

    user::revoke_role(&pool, id, role).await?;

    crate::audit::log(
        &pool,
        actor_id,
        "role.revoke",
        "user_roles",
        id,
        serde_json::json!({ "role": role.as_str() }),
    )
    .await;

    if id == actor_id {
        refresh_auth(&pool, &session, actor_id).await;
    }

    let _ = session.insert("flash", format!("Role {} revoked", role.label()));
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/users"))
        .finish())
}
