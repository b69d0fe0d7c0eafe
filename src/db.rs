use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub const MIGRATIONS: &str = include_str!("schema.sql");
const BASE_SEED: &str = include_str!("seed.sql");

pub async fn init_pool(database_url: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await
        .expect("Failed to create DB pool")
}

pub async fn run_migrations(pool: &PgPool) {
    sqlx::raw_sql(MIGRATIONS)
        .execute(pool)
        .await
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the permission catalogue, role-permission mapping, settings, and
/// starter service types, then create the initial admin user if the users
/// table is empty. Safe to call on every startup.
pub async fn seed_base(pool: &PgPool, admin_password_hash: &str) {
    sqlx::raw_sql(BASE_SEED)
        .execute(pool)
        .await
        .expect("Failed to seed base data");

    let (user_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap_or((0,));
    if user_count > 0 {
        log::info!("Users already present ({user_count}), skipping admin seed");
        return;
    }

    let (admin_id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (email, password_hash, full_name) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("admin@poolcare.local")
    .bind(admin_password_hash)
    .bind("Administrator")
    .fetch_one(pool)
    .await
    .expect("Failed to create admin user");

    sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, 'admin')")
        .bind(admin_id)
        .execute(pool)
        .await
        .expect("Failed to assign admin role");

    log::info!("Base seed complete (admin user id {admin_id})");
}
