use tempfile::TempDir;
use waypost::geo::VenueStore;
use waypost::models::Venue;

fn venue(id: &str, lat: f64, lng: f64) -> Venue {
    Venue::new(id.into(), lat, lng)
}

fn store_with(dir: &TempDir, json: &str) -> VenueStore {
    let path = dir.path().join("venues.json");
    std::fs::write(&path, json).unwrap();
    VenueStore::new(path)
}

#[test]
fn loads_array_and_skips_malformed_entries() {
    let dir = TempDir::new().unwrap();
    let store = store_with(
        &dir,
        r#"[
            {"id": "a", "latitude": 10.0, "longitude": 20.0},
            {"id": "", "latitude": 10.0, "longitude": 20.0},
            {"id": "bad-coords", "latitude": 95.0, "longitude": 20.0},
            {"latitude": 10.0, "longitude": 20.0},
            {"id": "b", "latitude": -5.0, "longitude": 7.5, "category": "cafe"}
        ]"#,
    );
    assert_eq!(store.len(), 2);
    assert!(store.get("a").is_some());
    assert_eq!(store.get("b").unwrap().category, "cafe");
    assert!(store.get("bad-coords").is_none());
}

#[test]
fn missing_file_yields_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = VenueStore::new(dir.path().join("absent.json"));
    assert_eq!(store.len(), 0);
    assert!(store.get("anything").is_none());
}

#[test]
fn duplicate_ids_in_file_keep_the_last_entry() {
    let dir = TempDir::new().unwrap();
    let store = store_with(
        &dir,
        r#"[
            {"id": "a", "latitude": 1.0, "longitude": 1.0, "category": "old"},
            {"id": "a", "latitude": 2.0, "longitude": 2.0, "category": "new"}
        ]"#,
    );
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("a").unwrap().category, "new");
}

#[test]
fn upsert_creates_then_updates() {
    let dir = TempDir::new().unwrap();
    let store = store_with(&dir, "[]");
    assert!(store.upsert(venue("a", 1.0, 2.0)));
    let mut updated = venue("a", 3.0, 4.0);
    updated.category = "bar".into();
    assert!(!store.upsert(updated));
    assert_eq!(store.len(), 1);
    let got = store.get("a").unwrap();
    assert_eq!(got.latitude, 3.0);
    assert_eq!(got.category, "bar");
}

#[test]
fn remove_keeps_index_map_coherent() {
    let dir = TempDir::new().unwrap();
    let store = store_with(&dir, "[]");
    for id in ["a", "b", "c", "d"] {
        store.upsert(venue(id, 0.0, 0.0));
    }
    // Removing the first element backfills it with the last one; every
    // remaining id must still resolve.
    assert!(store.remove("a").is_some());
    assert_eq!(store.len(), 3);
    for id in ["b", "c", "d"] {
        assert_eq!(store.get(id).unwrap().id, id);
    }
    assert!(store.remove("a").is_none());

    assert!(store.remove("d").is_some());
    assert!(store.remove("b").is_some());
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("c").unwrap().id, "c");
}

#[test]
fn persist_writes_reloadable_state() {
    let dir = TempDir::new().unwrap();
    let store = store_with(&dir, "[]");
    let mut v = venue("a", 12.5, -7.25);
    v.tags.insert("name".into(), "Cafe One".into());
    store.upsert(v);
    store.upsert(venue("b", 1.0, 2.0));
    store.persist().unwrap();

    // A second store over the same file sees the persisted table.
    let reloaded = VenueStore::new(dir.path().join("venues.json"));
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get("a").unwrap().name(), "Cafe One");
}

#[test]
fn clear_drops_unpersisted_changes() {
    let dir = TempDir::new().unwrap();
    let store = store_with(&dir, r#"[{"id": "a", "latitude": 1.0, "longitude": 1.0}]"#);
    store.upsert(venue("b", 2.0, 2.0));
    assert_eq!(store.len(), 2);
    store.clear();
    // Nothing was persisted, so the reload only sees the original record.
    assert_eq!(store.len(), 1);
    assert!(store.get("b").is_none());
}

#[test]
fn merge_reports_created_and_updated() {
    let dir = TempDir::new().unwrap();
    let store = store_with(&dir, r#"[{"id": "a", "latitude": 1.0, "longitude": 1.0}]"#);
    let stats = store.merge(vec![venue("a", 9.0, 9.0), venue("b", 2.0, 2.0), venue("c", 3.0, 3.0)]);
    assert_eq!(stats.created, 2);
    assert_eq!(stats.updated, 1);
    assert_eq!(store.len(), 3);
    assert_eq!(store.get("a").unwrap().latitude, 9.0);
}
