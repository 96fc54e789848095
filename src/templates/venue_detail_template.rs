use crate::models::{CurrentUser, VenueView};
use askama::Template;

#[derive(Template)]
#[template(path = "venue_detail.html")]
pub struct VenueDetailTemplate<'a> {
    pub current_user: Option<CurrentUser>,
    pub site_host: String,
    pub base_url: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub view: &'a VenueView,
    pub can_edit: bool,
}

crate::impl_base_template!(VenueDetailTemplate<'_>);
