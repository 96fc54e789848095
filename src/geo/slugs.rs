use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::models::RegionQuery;
use crate::utils::slugify;

/// Cache over the slugs file: canonical URL slug -> region query for the SEO
/// pages. The file is a JSON object keyed by slug.
#[derive(Clone)]
pub struct SlugsCache {
    path: PathBuf,
    table: Arc<Mutex<Option<Arc<HashMap<String, RegionQuery>>>>>,
}

impl SlugsCache {
    pub fn new(path: PathBuf) -> Self {
        SlugsCache {
            path,
            table: Arc::new(Mutex::new(None)),
        }
    }

    pub fn get(&self) -> Arc<HashMap<String, RegionQuery>> {
        let mut guard = self.table.lock().unwrap();
        if let Some(existing) = guard.as_ref() {
            return existing.clone();
        }
        let loaded = Arc::new(load_slugs(&self.path));
        *guard = Some(loaded.clone());
        loaded
    }

    /// Resolve a raw path segment. The input is canonicalized first so that
    /// `/d/Coffee-Berlin` and `/d/coffee-berlin` land on the same entry.
    pub fn resolve(&self, raw: &str) -> Option<RegionQuery> {
        self.get().get(&slugify(raw)).cloned()
    }

    pub fn clear(&self) {
        *self.table.lock().unwrap() = None;
    }

    pub fn len(&self) -> usize {
        self.get().len()
    }

    /// Slugs in stable order, for the sitemap.
    pub fn all_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self.get().keys().cloned().collect();
        slugs.sort();
        slugs
    }
}

fn load_slugs(path: &Path) -> HashMap<String, RegionQuery> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(path = %path.display(), %e, "Slugs file not readable; starting with an empty table");
            return HashMap::new();
        }
    };
    match serde_json::from_str::<HashMap<String, RegionQuery>>(&text) {
        Ok(raw) => {
            // Keys are canonicalized on the way in so lookups never miss on case.
            let map: HashMap<String, RegionQuery> =
                raw.into_iter().map(|(k, v)| (slugify(&k), v)).collect();
            tracing::info!(count = map.len(), path = %path.display(), "Loaded slugs");
            map
        }
        Err(e) => {
            tracing::error!(path = %path.display(), %e, "Failed to parse slugs file");
            HashMap::new()
        }
    }
}
