use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{get_user_id, require_permission};
use crate::auth::{csrf, validate};
use crate::errors::{AppError, render};
use crate::models::customer::{self, CustomerForm, PersonType};
use crate::templates_structs::{CustomerFormTemplate, CustomerListTemplate, PageContext};

#[derive(Deserialize)]
pub struct CustomerQuery {
    page: Option<i64>,
    q: Option<String>,
    #[serde(default)]
    show_inactive: bool,
}

pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<CustomerQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "customers.view")?;
    let ctx = PageContext::build(&session, &pool, "/customers").await?;

    let customer_page = customer::find_paginated(
        &pool,
        query.page.unwrap_or(1),
        25,
        query.q.as_deref(),
        !query.show_inactive,
    )
    .await?;

    render(CustomerListTemplate {
        ctx,
        customer_page,
        search_query: query.q.clone(),
        show_inactive: query.show_inactive,
    })
}

pub async fn new_form(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "customers.create")?;
    let ctx = PageContext::build(&session, &pool, "/customers").await?;
    render(CustomerFormTemplate {
        ctx,
        customer: None,
        errors: Vec::new(),
    })
}

fn validate_customer(form: &CustomerForm) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(e) = validate::validate_required(&form.full_name, "Name", 200) {
        errors.push(e);
    }
    if PersonType::parse(&form.person_type).is_none() {
        errors.push("Person type must be individual or company".to_string());
    }
    if let Some(e) = validate::validate_required(&form.document, "Document", 50) {
        errors.push(e);
    }
    if let Some(e) = validate::validate_required(&form.phone, "Phone", 50) {
        errors.push(e);
    }
    if !form.email.trim().is_empty() {
        if let Some(e) = validate::validate_email(&form.email) {
            errors.push(e);
        }
    }
    if let Some(e) = validate::validate_optional(&form.observations, "Observations", 2000) {
        errors.push(e);
    }
    errors
}

pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<CustomerForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "customers.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let errors = validate_customer(&form);
    if !errors.is_empty() {
        let ctx = PageContext::build(&session, &pool, "/customers").await?;
        return render(CustomerFormTemplate {
            ctx,
            customer: None,
            errors,
        });
    }

    let user_id = get_user_id(&session).unwrap_or(0);
    let id = customer::create(&pool, &form, user_id).await?;

    crate::audit::log(
        &pool,
        user_id,
        "create",
        "customers",
        id,
        serde_json::json!({ "full_name": form.full_name.trim() }),
    )
    .await;

    let _ = session.insert("flash", "Customer created successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/customers"))
        .finish())
}

pub async fn edit_form(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "customers.edit")?;
    let ctx = PageContext::build(&session, &pool, "/customers").await?;

    let customer = customer::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    render(CustomerFormTemplate {
        ctx,
        customer: Some(customer),
        errors: Vec::new(),
    })
}

pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CustomerForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "customers.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let existing = customer::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let errors = validate_customer(&form);
    if !errors.is_empty() {
        let ctx = PageContext::build(&session, &pool, "/customers").await?;
        return render(CustomerFormTemplate {
            ctx,
            customer: Some(existing),
            errors,
        });
    }

    customer::update(&pool, id, &form).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    crate::audit::log(
        &pool,
        user_id,
        "update",
        "customers",
        id,
        serde_json::json!({ "full_name": form.full_name.trim() }),
    )
    .await;

    let _ = session.insert("flash", "Customer updated successfully");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/customers"))
        .finish())
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

/// Flip the active flag. Customers are never hard-deleted.
pub async fn toggle_active(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "customers.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let existing = customer::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    customer::set_active(&pool, id, !existing.is_active).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    let action = if existing.is_active { "deactivate" } else { "activate" };
    crate::audit::log(
        &pool,
        user_id,
        action,
        "customers",
        id,
        serde_json::json!({ "full_name": existing.full_name }),
    )
    .await;

    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/customers"))
        .finish())
}
