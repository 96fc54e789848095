use crate::models::{CurrentUser, UserRow};
use askama::Template;

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersPageTemplate<'a> {
    pub current_user: Option<CurrentUser>,
    pub site_host: String,
    pub base_url: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub rows: &'a Vec<UserRow>,
}

crate::impl_base_template!(UsersPageTemplate<'_>);
