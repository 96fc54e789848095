// Base template trait for inheritance
pub mod base_template;
pub use base_template::BaseTemplate;

// Individual template files
pub mod about_template;
pub mod admin_template;
pub mod login_template;
pub mod region_page_template;
pub mod users_page_template;
pub mod venue_detail_template;
pub mod venue_edit_template;
pub mod venues_page_template;

// Re-export all templates
pub use about_template::AboutTemplate;
pub use admin_template::AdminTemplate;
pub use login_template::LoginTemplate;
pub use region_page_template::RegionPageTemplate;
pub use users_page_template::UsersPageTemplate;
pub use venue_detail_template::VenueDetailTemplate;
pub use venue_edit_template::VenueEditTemplate;
pub use venues_page_template::VenuesPageTemplate;

// Type alias for the shorter name used in handlers
pub type UsersTemplate<'a> = UsersPageTemplate<'a>;
