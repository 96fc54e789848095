use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::geo::valid_coordinates;
use crate::models::Venue;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub created: usize,
    pub updated: usize,
}

struct VenueTable {
    venues: Vec<Venue>,
    by_id: HashMap<String, usize>,
}

impl VenueTable {
    fn rebuild_index(&mut self) {
        self.by_id = self
            .venues
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id.clone(), i))
            .collect();
    }
}

/// Writable venue cache backed by venues.json.
///
/// The file is read once; afterwards every lookup and mutation goes through
/// the in-memory table. An id -> index map rides alongside the venue vector
/// for O(1) lookup and is kept coherent across upserts and removals.
/// `persist` rewrites the file atomically.
#[derive(Clone)]
pub struct VenueStore {
    path: PathBuf,
    table: Arc<Mutex<Option<VenueTable>>>,
}

impl VenueStore {
    pub fn new(path: PathBuf) -> Self {
        VenueStore {
            path,
            table: Arc::new(Mutex::new(None)),
        }
    }

    fn with_table<R>(&self, f: impl FnOnce(&mut VenueTable) -> R) -> R {
        let mut guard = self.table.lock().unwrap();
        if guard.is_none() {
            let venues = load_venues(&self.path);
            let mut table = VenueTable {
                venues,
                by_id: HashMap::new(),
            };
            table.rebuild_index();
            *guard = Some(table);
        }
        f(guard.as_mut().unwrap())
    }

    pub fn len(&self) -> usize {
        self.with_table(|t| t.venues.len())
    }

    pub fn all(&self) -> Vec<Venue> {
        self.with_table(|t| t.venues.clone())
    }

    pub fn get(&self, id: &str) -> Option<Venue> {
        self.with_table(|t| t.by_id.get(id).map(|&i| t.venues[i].clone()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.with_table(|t| t.by_id.contains_key(id))
    }

    /// Insert or replace by id. Returns true when the venue was new.
    pub fn upsert(&self, venue: Venue) -> bool {
        self.with_table(|t| match t.by_id.get(&venue.id) {
            Some(&i) => {
                t.venues[i] = venue;
                false
            }
            None => {
                t.by_id.insert(venue.id.clone(), t.venues.len());
                t.venues.push(venue);
                true
            }
        })
    }

    /// Remove by id. The vacated slot is backfilled with the last element and
    /// the index map is repointed, so removal stays O(1).
    pub fn remove(&self, id: &str) -> Option<Venue> {
        self.with_table(|t| {
            let i = t.by_id.remove(id)?;
            let removed = t.venues.swap_remove(i);
            if i < t.venues.len() {
                let moved_id = t.venues[i].id.clone();
                t.by_id.insert(moved_id, i);
            }
            Some(removed)
        })
    }

    pub fn merge(&self, incoming: Vec<Venue>) -> MergeStats {
        let mut stats = MergeStats::default();
        for venue in incoming {
            if self.upsert(venue) {
                stats.created += 1;
            } else {
                stats.updated += 1;
            }
        }
        stats
    }

    /// Rewrite venues.json atomically (write to a temp file in the same
    /// directory, then rename over the original).
    pub fn persist(&self) -> io::Result<()> {
        let venues = self.all();
        let json = serde_json::to_string_pretty(&venues)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        io::Write::write_all(&mut tmp, json.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn clear(&self) {
        *self.table.lock().unwrap() = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.table.lock().unwrap().is_some()
    }
}

fn load_venues(path: &Path) -> Vec<Venue> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(path = %path.display(), %e, "Venues file not readable; starting with an empty table");
            return Vec::new();
        }
    };
    let raw: Vec<serde_json::Value> = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(path = %path.display(), %e, "Failed to parse venues file");
            return Vec::new();
        }
    };
    let mut venues: Vec<Venue> = Vec::with_capacity(raw.len());
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;
    for value in raw {
        match serde_json::from_value::<Venue>(value) {
            Ok(v) if !v.id.is_empty() && valid_coordinates(v.latitude, v.longitude) => {
                // Later duplicates win, matching upsert semantics.
                if let Some(&i) = seen.get(&v.id) {
                    venues[i] = v;
                } else {
                    seen.insert(v.id.clone(), venues.len());
                    venues.push(v);
                }
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, loaded = venues.len(), "Skipped malformed venue entries");
    }
    tracing::info!(count = venues.len(), path = %path.display(), "Loaded venues");
    venues
}
