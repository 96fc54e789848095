pub mod admin_view;
pub mod app_state;
pub mod city;
pub mod current_user;
pub mod slug_entry;
pub mod user_record;
pub mod user_row;
pub mod venue;
pub mod venue_view;

// Re-export the model types used throughout handlers and services
pub use admin_view::CacheStats;
pub use app_state::AppState;
pub use city::{City, NearestCity};
pub use current_user::CurrentUser;
pub use slug_entry::RegionQuery;
pub use user_record::UserRecord;
pub use user_row::UserRow;
pub use venue::Venue;
pub use venue_view::{VenueRow, VenueView};
