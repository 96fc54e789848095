use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::geo::{GeoCache, VenueStore};
use crate::models::user_record::UserRecord;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<Mutex<HashMap<String, UserRecord>>>,
    pub sessions: Arc<Mutex<HashMap<String, String>>>,
    pub flash_store: Arc<Mutex<HashMap<String, Vec<String>>>>,
    pub geo: GeoCache,
    pub venues: VenueStore,
    pub public_base_url: String,
    pub sync_api_base_url: String,
    pub sync_api_token: String,
    pub announcer_webhook_url: Option<String>,
    pub client: reqwest::Client,
    pub hidden_venues: Arc<Mutex<HashSet<String>>>,
    pub custom_css: Option<String>,
}

impl AppState {
    pub fn is_venue_hidden(&self, id: &str) -> bool {
        self.hidden_venues.lock().unwrap().contains(id)
    }
}
