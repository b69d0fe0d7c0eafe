use askama::Template;

use super::PageContext;
use crate::models::customer::{CustomerDetail, CustomerPage};

#[derive(Template)]
#[template(path = "customers/list.html")]
pub struct CustomerListTemplate {
    pub ctx: PageContext,
    pub customer_page: CustomerPage,
    pub search_query: Option<String>,
    pub show_inactive: bool,
}

/// Shared by the create form (`customer: None`) and edit form.
#[derive(Template)]
#[template(path = "customers/form.html")]
pub struct CustomerFormTemplate {
    pub ctx: PageContext,
    pub customer: Option<CustomerDetail>,
    pub errors: Vec<String>,
}
