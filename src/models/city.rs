use serde::{Deserialize, Serialize};

/// One row of the cities file. Loaded once, immutable for the process lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub admin1: String,
    pub population: u64,
}

impl City {
    /// Key into the admin1 table, e.g. "US.CA".
    pub fn admin1_key(&self) -> String {
        format!("{}.{}", self.country, self.admin1)
    }
}

/// JSON payload returned by the nearest-city endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct NearestCity {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub admin1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin1_name: Option<String>,
    pub population: u64,
}

impl NearestCity {
    pub fn from_city(city: City, admin1_name: Option<String>) -> Self {
        NearestCity {
            name: city.name,
            latitude: city.latitude,
            longitude: city.longitude,
            country: city.country,
            admin1: city.admin1,
            admin1_name,
            population: city.population,
        }
    }
}
