use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Cache over the admin1 subdivision file, used for address formatting.
///
/// Each line maps an ISO code to a display name: `US.CA \t California`.
/// Malformed lines are skipped at load.
#[derive(Clone)]
pub struct Admin1Cache {
    path: PathBuf,
    table: Arc<Mutex<Option<Arc<HashMap<String, String>>>>>,
}

impl Admin1Cache {
    pub fn new(path: PathBuf) -> Self {
        Admin1Cache {
            path,
            table: Arc::new(Mutex::new(None)),
        }
    }

    pub fn get(&self) -> Arc<HashMap<String, String>> {
        let mut guard = self.table.lock().unwrap();
        if let Some(existing) = guard.as_ref() {
            return existing.clone();
        }
        let loaded = Arc::new(load_admin1(&self.path));
        *guard = Some(loaded.clone());
        loaded
    }

    /// Display name for a `country` + `admin1` code pair, e.g. ("US", "CA").
    pub fn name_for(&self, country: &str, admin1: &str) -> Option<String> {
        if country.is_empty() || admin1.is_empty() {
            return None;
        }
        self.get().get(&format!("{}.{}", country, admin1)).cloned()
    }

    pub fn clear(&self) {
        *self.table.lock().unwrap() = None;
    }

    pub fn len(&self) -> usize {
        self.get().len()
    }
}

fn load_admin1(path: &Path) -> HashMap<String, String> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(path = %path.display(), %e, "Admin1 file not readable; starting with an empty table");
            return HashMap::new();
        }
    };
    let mut map = HashMap::new();
    let mut skipped = 0usize;
    for line in text.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('\t') {
            Some((code, name)) if !code.trim().is_empty() && !name.trim().is_empty() => {
                map.insert(code.trim().to_string(), name.trim().to_string());
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, loaded = map.len(), "Skipped malformed admin1 lines");
    }
    map
}
