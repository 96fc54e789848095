pub mod seo_service;
pub mod sync_service;
pub mod user_service;
pub mod venue_service;

// Re-export commonly used functions
pub use seo_service::{build_sitemap, region_title, venues_for_region};
pub use sync_service::{
    enrich_venues, parse_venue_payload_file, sync_venues, EnrichStats, SyncError,
};
pub use user_service::{
    generate_password_hash, load_users_from_file, persist_users_file, random_session_id,
    verify_password,
};
pub use venue_service::{allocate_venue_id, search_venues, SearchFilter};
