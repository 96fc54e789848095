use crate::models::{CacheStats, CurrentUser};
use askama::Template;

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub current_user: Option<CurrentUser>,
    pub site_host: String,
    pub base_url: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub stats: CacheStats,
    pub hidden: Vec<String>,
}

crate::impl_base_template!(AdminTemplate);
