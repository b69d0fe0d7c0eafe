use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use poolcare::auth::rate_limit::RateLimiter;
use poolcare::{audit, auth, db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set (see .env.example)");

    // Initialize database
    let pool = db::init_pool(&database_url).await;
    db::run_migrations(&pool).await;

    // Seed permission catalogue, role mapping, settings, admin user
    let admin_hash =
        auth::password::hash_password("admin123").expect("Failed to hash default password");
    db::seed_base(&pool, &admin_hash).await;

    // Clean up old audit entries based on retention policy
    audit::cleanup_old_entries(&pool).await;

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let limiter = RateLimiter::new();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(limiter.clone()))
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            // Public routes
            .route("/login", web::get().to(handlers::auth_handlers::login_page))
            .route("/login", web::post().to(handlers::auth_handlers::login_submit))
            // Root redirect
            .route(
                "/",
                web::get().to(|| async {
                    actix_web::HttpResponse::SeeOther()
                        .insert_header(("Location", "/dashboard"))
                        .finish()
                }),
            )
            // Protected routes
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    .route("/dashboard", web::get().to(handlers::dashboard::index))
                    .route("/logout", web::post().to(handlers::auth_handlers::logout))
                    // Customers — /customers/new BEFORE /customers/{id} to avoid routing conflict
                    .route("/customers", web::get().to(handlers::customer_handlers::list))
                    .route("/customers/new", web::get().to(handlers::customer_handlers::new_form))
                    .route("/customers", web::post().to(handlers::customer_handlers::create))
                    .route("/customers/{id}/edit", web::get().to(handlers::customer_handlers::edit_form))
                    .route("/customers/{id}", web::post().to(handlers::customer_handlers::update))
                    .route("/customers/{id}/toggle", web::post().to(handlers::customer_handlers::toggle_active))
                    // Appointments
                    .route("/appointments", web::get().to(handlers::appointment_handlers::list))
                    .route("/appointments/new", web::get().to(handlers::appointment_handlers::new_form))
                    .route("/appointments", web::post().to(handlers::appointment_handlers::create))
                    .route("/appointments/{id}", web::get().to(handlers::appointment_handlers::detail))
                    .route("/appointments/{id}/edit", web::get().to(handlers::appointment_handlers::edit_form))
                    .route("/appointments/{id}", web::post().to(handlers::appointment_handlers::update))
                    .route("/appointments/{id}/delete", web::post().to(handlers::appointment_handlers::delete))
                    // Appointment task checklist
                    .route("/appointments/{id}/tasks", web::post().to(handlers::appointment_handlers::add_task))
                    .route("/appointments/{id}/tasks/{task_id}/toggle", web::post().to(handlers::appointment_handlers::toggle_task))
                    .route("/appointments/{id}/tasks/{task_id}/delete", web::post().to(handlers::appointment_handlers::delete_task))
                    .route("/appointments/{id}/tasks/{task_id}", web::post().to(handlers::appointment_handlers::update_task))
                    .route("/appointments/{id}/apply-template", web::post().to(handlers::appointment_handlers::apply_template))
                    // Financial
                    .route("/financial", web::get().to(handlers::financial_handlers::index))
                    .route("/financial/invoices/new", web::get().to(handlers::financial_handlers::invoice_form))
                    .route("/financial/invoices", web::post().to(handlers::financial_handlers::invoice_create))
                    .route("/financial/invoices/{id}/status", web::post().to(handlers::financial_handlers::invoice_set_status))
                    .route("/financial/payables/new", web::get().to(handlers::financial_handlers::payable_form))
                    .route("/financial/payables", web::post().to(handlers::financial_handlers::payable_create))
                    .route("/financial/payables/{id}/status", web::post().to(handlers::financial_handlers::payable_set_status))
                    .route("/financial/receivables/new", web::get().to(handlers::financial_handlers::receivable_form))
                    .route("/financial/receivables", web::post().to(handlers::financial_handlers::receivable_create))
                    .route("/financial/receivables/{id}/status", web::post().to(handlers::financial_handlers::receivable_set_status))
                    // Users — /users/new BEFORE /users/{id}
                    .route("/users", web::get().to(handlers::user_handlers::list))
                    .route("/users/new", web::get().to(handlers::user_handlers::new_form))
                    .route("/users", web::post().to(handlers::user_handlers::create))
                    .route("/users/{id}/toggle", web::post().to(handlers::user_handlers::toggle_active))
                    .route("/users/{id}/roles/assign", web::post().to(handlers::user_handlers::assign_role))
                    .route("/users/{id}/roles/revoke", web::post().to(handlers::user_handlers::revoke_role))
                    // Account
                    .route("/account", web::get().to(handlers::account_handlers::form))
                    .route("/account", web::post().to(handlers::account_handlers::submit))
                    // Settings
                    .route("/settings", web::get().to(handlers::settings_handlers::list))
                    .route("/settings", web::post().to(handlers::settings_handlers::save))
                    // Audit log
                    .route("/audit", web::get().to(handlers::audit_handlers::list)),
            )
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
