use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;
use waypost::config;

// Env vars are process-global; serialize the tests that touch them.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn test_sanitize_base_url_removes_trailing_slash() {
    assert_eq!(
        config::sanitize_base_url("https://waypost.example.com/"),
        "https://waypost.example.com"
    );
}

#[test]
fn test_sanitize_base_url_no_trailing_slash() {
    assert_eq!(
        config::sanitize_base_url("https://waypost.example.com"),
        "https://waypost.example.com"
    );
}

#[test]
fn test_sanitize_base_url_multiple_trailing_slashes() {
    assert_eq!(
        config::sanitize_base_url("https://waypost.example.com///"),
        "https://waypost.example.com"
    );
}

#[test]
fn test_sanitize_base_url_with_whitespace() {
    assert_eq!(
        config::sanitize_base_url("  https://waypost.example.com/  "),
        "https://waypost.example.com"
    );
}

#[test]
fn test_sanitize_base_url_empty_string() {
    assert_eq!(config::sanitize_base_url(""), "http://localhost:8080");
}

#[test]
fn test_sanitize_base_url_whitespace_only() {
    assert_eq!(config::sanitize_base_url("   "), "http://localhost:8080");
}

#[test]
fn test_hidden_venue_ids_parsing() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("HIDDEN_VENUE_IDS", " wp-1, wp-2 ,,wp-3 ");
    let ids = config::get_hidden_venue_ids();
    assert_eq!(ids.len(), 3);
    assert!(ids.contains("wp-1"));
    assert!(ids.contains("wp-2"));
    assert!(ids.contains("wp-3"));
    env::remove_var("HIDDEN_VENUE_IDS");
}

#[test]
fn test_hidden_venue_ids_empty() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("HIDDEN_VENUE_IDS");
    assert!(config::get_hidden_venue_ids().is_empty());
}

#[test]
fn test_data_files_resolve_under_data_dir() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("DATA_DIR", "/srv/waypost");
    env::remove_var("CITIES_FILE");
    assert_eq!(
        config::get_cities_file(),
        std::path::PathBuf::from("/srv/waypost/cities.tsv")
    );
    env::set_var("CITIES_FILE", "geo/all-cities.tsv");
    assert_eq!(
        config::get_cities_file(),
        std::path::PathBuf::from("/srv/waypost/geo/all-cities.tsv")
    );
    env::remove_var("DATA_DIR");
    env::remove_var("CITIES_FILE");
}

#[test]
fn test_absolute_data_file_ignores_data_dir() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("DATA_DIR", "/srv/waypost");
    env::set_var("VENUES_FILE", "/var/lib/waypost/venues.json");
    assert_eq!(
        config::get_venues_file(),
        std::path::PathBuf::from("/var/lib/waypost/venues.json")
    );
    env::remove_var("DATA_DIR");
    env::remove_var("VENUES_FILE");
}

#[test]
fn test_sync_base_url_trims_trailing_slash() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("SYNC_API_BASE_URL", "https://directory.example.com/api/");
    assert_eq!(
        config::get_sync_api_base_url(),
        "https://directory.example.com/api"
    );
    env::remove_var("SYNC_API_BASE_URL");
}

#[test]
fn test_announcer_webhook_blank_is_none() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::set_var("ANNOUNCER_WEBHOOK_URL", "   ");
    assert_eq!(config::get_announcer_webhook_url(), None);
    env::remove_var("ANNOUNCER_WEBHOOK_URL");
}
