// Template context structures for Askama templates, organized by domain.
// All types are re-exported: `use poolcare::templates_structs::*`

use actix_session::Session;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::{Permissions, Roles, get_permissions, get_roles, get_username, take_flash};
use crate::errors::AppError;
use crate::models::nav::{self, NavItem};
use crate::models::setting;

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.username`, `ctx.nav_items`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub permissions: Permissions,
    pub roles: Roles,
    pub flash: Option<String>,
    pub nav_items: Vec<NavItem>,
    pub app_name: String,
    pub csrf_token: String,
}

impl PageContext {
    pub async fn build(
        session: &Session,
        pool: &PgPool,
        current_path: &str,
    ) -> Result<Self, AppError> {
        let username = get_username(session)
            .map_err(|e| AppError::Session(format!("Failed to get username: {}", e)))?;
        let permissions = get_permissions(session)
            .map_err(|e| AppError::Session(format!("Failed to get permissions: {}", e)))?;
        let roles = get_roles(session)
            .map_err(|e| AppError::Session(format!("Failed to get roles: {}", e)))?;
        let flash = take_flash(session);
        let nav_items = nav::build(&permissions, current_path);
        let app_name = setting::get_value(pool, "app.name", "Poolcare").await;
        let csrf_token = csrf::get_or_create_token(session);
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            username,
            avatar_initial,
            permissions,
            roles,
            flash,
            nav_items,
            app_name,
            csrf_token,
        })
    }
}

pub mod appointment;
pub mod audit;
pub mod common;
pub mod customer;
pub mod dashboard;
pub mod financial;
pub mod user;

pub use self::appointment::{
    AppointmentDetailTemplate, AppointmentFormTemplate, AppointmentListTemplate, StatusOption,
};
pub use self::audit::AuditListTemplate;
pub use self::common::{AccountTemplate, LoginTemplate, SettingsTemplate};
pub use self::customer::{CustomerFormTemplate, CustomerListTemplate};
pub use self::dashboard::DashboardTemplate;
pub use self::financial::{
    FinancialTemplate, InvoiceFormTemplate, PayableFormTemplate, ReceivableFormTemplate,
};
pub use self::user::{UserFormTemplate, UserListTemplate};
