// In-memory geo layer: flat files loaded once per process, cached until an
// explicit reload. Nearest-city queries go through a static k-d tree that is
// built lazily on first use.
pub mod admin1;
pub mod cities;
pub mod index;
pub mod slugs;
pub mod venues;

pub use admin1::Admin1Cache;
pub use cities::CitiesCache;
pub use index::CityIndex;
pub use slugs::SlugsCache;
pub use venues::{MergeStats, VenueStore};

use std::path::PathBuf;

use crate::models::{City, NearestCity};

/// Cloneable handle over the read-only geo caches (cities, admin1, slugs).
/// Venue state lives separately in [`VenueStore`] because it is writable.
#[derive(Clone)]
pub struct GeoCache {
    pub cities: CitiesCache,
    pub admin1: Admin1Cache,
    pub slugs: SlugsCache,
}

impl GeoCache {
    pub fn new(cities_file: PathBuf, admin1_file: PathBuf, slugs_file: PathBuf) -> Self {
        GeoCache {
            cities: CitiesCache::new(cities_file),
            admin1: Admin1Cache::new(admin1_file),
            slugs: SlugsCache::new(slugs_file),
        }
    }

    /// Nearest city by great-circle ordering. `None` when the coordinates are
    /// invalid or the city list is empty.
    pub fn nearest_city(&self, latitude: f64, longitude: f64) -> Option<City> {
        self.cities.nearest(latitude, longitude)
    }

    /// Nearest city with the admin1 code resolved to its display name.
    pub fn nearest_city_resolved(&self, latitude: f64, longitude: f64) -> Option<NearestCity> {
        let city = self.nearest_city(latitude, longitude)?;
        let admin1_name = self.admin1.name_for(&city.country, &city.admin1);
        Some(NearestCity::from_city(city, admin1_name))
    }

    /// Drop every cached table. The next access reloads from disk and the
    /// next nearest-city query rebuilds the index.
    pub fn reload(&self) {
        self.cities.clear();
        self.admin1.clear();
        self.slugs.clear();
    }
}

pub fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}
