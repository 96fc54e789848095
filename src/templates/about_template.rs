use crate::models::CurrentUser;
use askama::Template;

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub current_user: Option<CurrentUser>,
    pub site_host: String,
    pub base_url: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub version: &'static str,
}

crate::impl_base_template!(AboutTemplate);
