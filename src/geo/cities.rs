use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::geo::index::CityIndex;
use crate::geo::valid_coordinates;
use crate::models::City;

/// Process-wide cache over the cities file.
///
/// The file is tab-delimited, one city per row:
/// `name \t latitude \t longitude \t country \t admin1 \t population`.
/// Rows that do not parse are skipped at load. The table and the spatial
/// index are immutable once built; `clear` is the only invalidation.
#[derive(Clone)]
pub struct CitiesCache {
    path: PathBuf,
    table: Arc<Mutex<Option<Arc<Vec<City>>>>>,
    index: Arc<Mutex<Option<Arc<CityIndex>>>>,
}

impl CitiesCache {
    pub fn new(path: PathBuf) -> Self {
        CitiesCache {
            path,
            table: Arc::new(Mutex::new(None)),
            index: Arc::new(Mutex::new(None)),
        }
    }

    /// The loaded city table, reading the file on first access.
    pub fn get(&self) -> Arc<Vec<City>> {
        let mut guard = self.table.lock().unwrap();
        if let Some(existing) = guard.as_ref() {
            return existing.clone();
        }
        let loaded = Arc::new(load_cities(&self.path));
        *guard = Some(loaded.clone());
        loaded
    }

    /// Nearest city by great-circle ordering; builds the index on first call.
    /// Invalid coordinates and an empty city list both yield `None`.
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Option<City> {
        if !valid_coordinates(latitude, longitude) {
            return None;
        }
        let cities = self.get();
        let index = self.index_for(&cities);
        index.nearest(latitude, longitude).map(|i| cities[i].clone())
    }

    fn index_for(&self, cities: &Arc<Vec<City>>) -> Arc<CityIndex> {
        let mut guard = self.index.lock().unwrap();
        if let Some(existing) = guard.as_ref() {
            return existing.clone();
        }
        let built = Arc::new(CityIndex::build(cities));
        tracing::debug!(cities = built.len(), "Built city spatial index");
        *guard = Some(built.clone());
        built
    }

    pub fn clear(&self) {
        *self.table.lock().unwrap() = None;
        *self.index.lock().unwrap() = None;
    }

    pub fn len(&self) -> usize {
        self.get().len()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.lock().unwrap().is_some()
    }

    pub fn index_built(&self) -> bool {
        self.index.lock().unwrap().is_some()
    }
}

fn load_cities(path: &Path) -> Vec<City> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(path = %path.display(), %e, "Cities file not readable; starting with an empty table");
            return Vec::new();
        }
    };
    let mut cities = Vec::new();
    let mut skipped = 0usize;
    for line in text.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_city_line(line) {
            Some(city) => cities.push(city),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, loaded = cities.len(), "Skipped malformed city rows");
    }
    tracing::info!(count = cities.len(), path = %path.display(), "Loaded cities");
    cities
}

fn parse_city_line(line: &str) -> Option<City> {
    let mut parts = line.split('\t');
    let name = parts.next()?.trim();
    let latitude: f64 = parts.next()?.trim().parse().ok()?;
    let longitude: f64 = parts.next()?.trim().parse().ok()?;
    let country = parts.next()?.trim();
    let admin1 = parts.next()?.trim();
    let population: u64 = parts.next()?.trim().parse().ok()?;
    if name.is_empty() || country.is_empty() || !valid_coordinates(latitude, longitude) {
        return None;
    }
    Some(City {
        name: name.to_string(),
        latitude,
        longitude,
        country: country.to_string(),
        admin1: admin1.to_string(),
        population,
    })
}
