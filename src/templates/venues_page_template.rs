use crate::models::{CurrentUser, VenueRow};
use askama::Template;

#[derive(Template)]
#[template(path = "venues.html")]
pub struct VenuesPageTemplate<'a> {
    pub current_user: Option<CurrentUser>,
    pub site_host: String,
    pub base_url: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub rows: &'a Vec<VenueRow>,
    pub q: String,
    pub category: String,
    pub country: String,
    pub categories: Vec<String>,
    pub total_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub prev_qs: String,
    pub next_qs: String,
}

crate::impl_base_template!(VenuesPageTemplate<'_>);
