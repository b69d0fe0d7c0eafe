use askama::Template;

use super::PageContext;
use crate::models::role::Role;
use crate::models::user::UserPage;

#[derive(Template)]
#[template(path = "users/list.html")]
pub struct UserListTemplate {
    pub ctx: PageContext,
    pub user_page: UserPage,
    pub all_roles: Vec<Role>,
    pub search_query: Option<String>,
}

#[derive(Template)]
#[template(path = "users/form.html")]
pub struct UserFormTemplate {
    pub ctx: PageContext,
    pub errors: Vec<String>,
}
