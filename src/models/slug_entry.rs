use serde::{Deserialize, Serialize};

/// Region query a canonical SEO slug resolves to. Every field is optional;
/// an empty query matches the whole directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl RegionQuery {
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.city.is_none() && self.category.is_none()
    }
}
