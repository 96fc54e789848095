use crate::models::CurrentUser;
use askama::Template;

#[derive(Template)]
#[template(path = "venue_edit.html")]
pub struct VenueEditTemplate {
    pub current_user: Option<CurrentUser>,
    pub site_host: String,
    pub base_url: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub is_new: bool,
    pub venue_id: String,
    pub latitude: String,
    pub longitude: String,
    pub category: String,
    pub subcategory: String,
    pub tags_text: String,
    pub error: Option<String>,
}

crate::impl_base_template!(VenueEditTemplate);
