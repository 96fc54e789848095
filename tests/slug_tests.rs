use tempfile::TempDir;
use waypost::geo::{SlugsCache, VenueStore};
use waypost::models::{RegionQuery, Venue};
use waypost::services::venues_for_region;
use waypost::utils::slugify;

fn slugs_with(dir: &TempDir, json: &str) -> SlugsCache {
    let path = dir.path().join("slugs.json");
    std::fs::write(&path, json).unwrap();
    SlugsCache::new(path)
}

#[test]
fn resolves_canonical_slug() {
    let dir = TempDir::new().unwrap();
    let cache = slugs_with(
        &dir,
        r#"{"cafe-berlin": {"country": "DE", "city": "Berlin", "category": "cafe"}}"#,
    );
    let query = cache.resolve("cafe-berlin").unwrap();
    assert_eq!(query.country.as_deref(), Some("DE"));
    assert_eq!(query.city.as_deref(), Some("Berlin"));
    assert_eq!(query.category.as_deref(), Some("cafe"));
}

#[test]
fn resolve_canonicalizes_the_request() {
    let dir = TempDir::new().unwrap();
    let cache = slugs_with(&dir, r#"{"cafe-berlin": {"country": "DE"}}"#);
    assert!(cache.resolve("Cafe-Berlin").is_some());
    assert!(cache.resolve("cafe berlin").is_some());
    assert!(cache.resolve("unknown-slug").is_none());
}

#[test]
fn file_keys_are_canonicalized_at_load() {
    let dir = TempDir::new().unwrap();
    let cache = slugs_with(&dir, r#"{"Cafe Berlin": {"country": "DE"}}"#);
    assert!(cache.resolve("cafe-berlin").is_some());
    assert_eq!(cache.all_slugs(), vec!["cafe-berlin".to_string()]);
}

#[test]
fn unreadable_or_invalid_file_yields_empty_cache() {
    let dir = TempDir::new().unwrap();
    let missing = SlugsCache::new(dir.path().join("absent.json"));
    assert_eq!(missing.len(), 0);
    let broken = slugs_with(&dir, "not json at all");
    assert_eq!(broken.len(), 0);
}

#[test]
fn slugify_matches_url_expectations() {
    assert_eq!(slugify("Coffee in Berlin"), "coffee-in-berlin");
    assert_eq!(slugify("ATM / London!"), "atm-london");
    assert_eq!(slugify(slugify("ATM / London!").as_str()), "atm-london");
}

#[test]
fn region_query_filters_venues() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("venues.json");
    std::fs::write(&path, "[]").unwrap();
    let store = VenueStore::new(path);

    let mut berlin_cafe = Venue::new("a".into(), 52.5, 13.4);
    berlin_cafe.category = "cafe".into();
    berlin_cafe.tags.insert("addr:city".into(), "Berlin".into());
    berlin_cafe.tags.insert("addr:country".into(), "DE".into());
    store.upsert(berlin_cafe);

    let mut hamburg_cafe = Venue::new("b".into(), 53.6, 10.0);
    hamburg_cafe.category = "cafe".into();
    hamburg_cafe.tags.insert("addr:city".into(), "Hamburg".into());
    hamburg_cafe.tags.insert("addr:country".into(), "DE".into());
    store.upsert(hamburg_cafe);

    let mut berlin_bar = Venue::new("c".into(), 52.5, 13.4);
    berlin_bar.category = "bar".into();
    berlin_bar.tags.insert("addr:city".into(), "Berlin".into());
    berlin_bar.tags.insert("addr:country".into(), "DE".into());
    store.upsert(berlin_bar);

    let cafes_in_berlin = venues_for_region(
        &store,
        &RegionQuery {
            country: Some("de".into()),
            city: Some("berlin".into()),
            category: Some("cafe".into()),
        },
    );
    assert_eq!(cafes_in_berlin.len(), 1);
    assert_eq!(cafes_in_berlin[0].id, "a");

    let germany = venues_for_region(
        &store,
        &RegionQuery {
            country: Some("DE".into()),
            ..Default::default()
        },
    );
    assert_eq!(germany.len(), 3);
}
