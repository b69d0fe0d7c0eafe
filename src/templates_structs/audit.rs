use askama::Template;

use super::PageContext;
use crate::models::audit::AuditEntryPage;

#[derive(Template)]
#[template(path = "audit/list.html")]
pub struct AuditListTemplate {
    pub ctx: PageContext,
    pub audit_page: AuditEntryPage,
    pub search_query: Option<String>,
    pub action_filter: Option<String>,
    pub table_filter: Option<String>,
    pub table_names: Vec<String>,
}
