use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_CITIES_FILE: &str = "cities.tsv";
pub const DEFAULT_ADMIN1_FILE: &str = "admin1.tsv";
pub const DEFAULT_SLUGS_FILE: &str = "slugs.json";
pub const DEFAULT_VENUES_FILE: &str = "venues.json";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "";
pub const DEFAULT_SYNC_API_BASE_URL: &str = "";
pub const DEFAULT_SYNC_API_TOKEN: &str = "";
pub const DEFAULT_OWNER_USERNAME: &str = "owner";
pub const DEFAULT_OWNER_PASSWORD: &str = "owner123";
pub const DEFAULT_OWNER_ROLE: &str = "owner";
pub const DEFAULT_EDITOR_ROLE: &str = "editor";
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()))
}

/// Resolve a data file path from an env var; relative values live under DATA_DIR.
fn data_file(var: &str, default: &str) -> PathBuf {
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    let p = PathBuf::from(&raw);
    if p.is_absolute() {
        p
    } else {
        get_data_dir().join(p)
    }
}

pub fn get_cities_file() -> PathBuf {
    data_file("CITIES_FILE", DEFAULT_CITIES_FILE)
}

pub fn get_admin1_file() -> PathBuf {
    data_file("ADMIN1_FILE", DEFAULT_ADMIN1_FILE)
}

pub fn get_slugs_file() -> PathBuf {
    data_file("SLUGS_FILE", DEFAULT_SLUGS_FILE)
}

pub fn get_venues_file() -> PathBuf {
    data_file("VENUES_FILE", DEFAULT_VENUES_FILE)
}

pub fn get_public_base_url() -> String {
    sanitize_base_url(&env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string()))
}

pub fn get_sync_api_base_url() -> String {
    env::var("SYNC_API_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_SYNC_API_BASE_URL.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string()
}

pub fn get_sync_api_token() -> String {
    env::var("SYNC_API_TOKEN").unwrap_or_else(|_| DEFAULT_SYNC_API_TOKEN.to_string())
}

pub fn get_announcer_webhook_url() -> Option<String> {
    let raw = env::var("ANNOUNCER_WEBHOOK_URL").unwrap_or_default();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn get_hidden_venue_ids() -> HashSet<String> {
    let raw = env::var("HIDDEN_VENUE_IDS").unwrap_or_default();
    let mut set = HashSet::new();
    if !raw.trim().is_empty() {
        for id in raw.split(',') {
            let t = id.trim();
            if !t.is_empty() {
                set.insert(t.to_string());
            }
        }
    }
    set
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "http://localhost:8080".to_string()
    } else {
        trimmed.to_string()
    }
}
