use crate::models::{CurrentUser, VenueRow};
use askama::Template;

#[derive(Template)]
#[template(path = "region.html")]
pub struct RegionPageTemplate<'a> {
    pub current_user: Option<CurrentUser>,
    pub site_host: String,
    pub base_url: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub title: String,
    pub slug: String,
    pub rows: &'a Vec<VenueRow>,
}

crate::impl_base_template!(RegionPageTemplate<'_>);
