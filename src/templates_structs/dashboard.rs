use askama::Template;

use super::PageContext;
use crate::models::audit::AuditEntry;
use crate::models::dashboard::DashboardStats;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub stats: DashboardStats,
    pub recent_activity: Vec<AuditEntry>,
}
