use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A point-of-interest record. Sourced from venues.json and kept in memory;
/// tags carry the free-form key/value payload (name, address, payment methods).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enriched_at: Option<DateTime<Utc>>,
}

impl Venue {
    pub fn new(id: String, latitude: f64, longitude: f64) -> Self {
        Venue {
            id,
            tags: HashMap::new(),
            category: String::new(),
            subcategory: None,
            latitude,
            longitude,
            enriched_at: None,
        }
    }

    /// Display name: the `name` tag, falling back to the id.
    pub fn name(&self) -> &str {
        self.tags.get("name").map(|s| s.as_str()).unwrap_or(&self.id)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|s| s.as_str())
    }

    /// Category falls back to the `category` tag when the field is empty.
    pub fn category_or_tag(&self) -> &str {
        if !self.category.is_empty() {
            return &self.category;
        }
        self.tags.get("category").map(|s| s.as_str()).unwrap_or("")
    }

    pub fn has_address(&self) -> bool {
        self.tags.contains_key("addr:city")
    }
}
