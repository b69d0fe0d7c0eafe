use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::auth::session::refresh_auth;
use crate::auth::{csrf, password};
use crate::errors::{AppError, render};
use crate::models::{setting, user};
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub async fn login_page(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    // If already logged in, redirect to dashboard
    if session.get::<i64>("user_id").unwrap_or(None).is_some() {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/dashboard"))
            .finish());
    }

    let app_name = setting::get_value(&pool, "app.name", "Poolcare").await;
    let csrf_token = csrf::get_or_create_token(&session);
    let tmpl = LoginTemplate {
        error: None,
        app_name,
        csrf_token,
    };
    render(tmpl)
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check BEFORE any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    let app_name = setting::get_value(&pool, "app.name", "Poolcare").await;

    if limiter.is_blocked(ip) {
        let csrf_token = csrf::get_or_create_token(&session);
        let tmpl = LoginTemplate {
            error: Some("Too many failed login attempts. Please try again later.".to_string()),
            app_name,
            csrf_token,
        };
        return render(tmpl);
    }

    let found = user::find_by_email(&pool, form.email.trim()).await?;

    let failed = |app_name: String| {
        let csrf_token = csrf::get_or_create_token(&session);
        let tmpl = LoginTemplate {
            error: Some("Invalid email or password".to_string()),
            app_name,
            csrf_token,
        };
        render(tmpl)
    };

    match found {
        Some(u) if u.is_active => match password::verify_password(&form.password, &u.password_hash)
        {
            Ok(true) => {
                // Successful login — clear rate limit for this IP
                limiter.clear(ip);

                let _ = session.insert("user_id", u.id);
                let _ = session.insert("username", &u.full_name);
                // Resolve roles and the union permission set into the session.
                refresh_auth(&pool, &session, u.id).await;

                crate::audit::log(
                    &pool,
                    u.id,
                    "login",
                    "users",
                    u.id,
                    serde_json::json!({ "email": u.email }),
                )
                .await;

                Ok(HttpResponse::SeeOther()
                    .insert_header(("Location", "/dashboard"))
                    .finish())
            }
            _ => {
                limiter.record_failure(ip);
                failed(app_name)
            }
        },
        // Deactivated accounts fail exactly like wrong credentials.
        _ => {
            limiter.record_failure(ip);
            failed(app_name)
        }
    }
}

pub async fn logout(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if let Some(user_id) = crate::auth::session::get_user_id(&session) {
        crate::audit::log(
            &pool,
            user_id,
            "logout",
            "users",
            user_id,
            serde_json::json!({}),
        )
        .await;
    }

    session.purge();
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/login"))
        .finish())
}
