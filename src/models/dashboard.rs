use sqlx::PgPool;

use crate::auth::session::Permissions;
use crate::models::{appointment, customer, financial, user};

/// Headline counters for the dashboard. Each figure is gated on the
/// viewer's permissions and degrades to zero if its query fails.
#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub total_customers: i64,
    pub total_users: i64,
    pub open_appointments: i64,
    pub pending_invoices: i64,
}

pub async fn load_stats(pool: &PgPool, permissions: &Permissions) -> DashboardStats {
    let mut stats = DashboardStats::default();

    if permissions.has("customers.view") {
        stats.total_customers = customer::count_active(pool).await.unwrap_or(0);
    }
    if permissions.has("users.view") {
        stats.total_users = user::count(pool).await.unwrap_or(0);
    }
    if permissions.has("appointments.view") {
        stats.open_appointments = appointment::count_open(pool).await.unwrap_or(0);
    }
    if permissions.has("financial.view") {
        stats.pending_invoices = financial::count_pending_invoices(pool).await.unwrap_or(0);
    }

    stats
}
