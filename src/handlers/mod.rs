pub mod account_handlers;
pub mod appointment_handlers;
pub mod audit_handlers;
pub mod auth_handlers;
pub mod customer_handlers;
pub mod dashboard;
pub mod financial_handlers;
pub mod settings_handlers;
pub mod user_handlers;
