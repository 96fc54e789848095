use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;
use waypost::geo::{Admin1Cache, CitiesCache, GeoCache};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

const CITIES: &str = "\
Berlin\t52.5200\t13.4050\tDE\tBE\t3748148
Paris\t48.8566\t2.3522\tFR\t11\t2140526
London\t51.5074\t-0.1278\tGB\tENG\t8961989
New York\t40.7128\t-74.0060\tUS\tNY\t8336817
Tokyo\t35.6762\t139.6503\tJP\t13\t13960236
";

#[test]
fn loads_only_well_formed_rows() {
    let dir = TempDir::new().unwrap();
    // 3 good rows, 4 bad ones (bad latitude, missing fields, bad population,
    // out-of-range longitude).
    let content = "\
Berlin\t52.52\t13.405\tDE\tBE\t3748148
broken\tnot-a-number\t13.0\tDE\tBE\t1
short\t50.0\t8.0
Paris\t48.8566\t2.3522\tFR\t11\t2140526
badpop\t50.0\t8.0\tDE\tHE\tmany
wrapped\t50.0\t999.0\tDE\tHE\t5
London\t51.5074\t-0.1278\tGB\tENG\t8961989
";
    let cache = CitiesCache::new(write_file(&dir, "cities.tsv", content));
    assert_eq!(cache.len(), 3);
}

#[test]
fn missing_file_yields_empty_cache_and_no_nearest() {
    let dir = TempDir::new().unwrap();
    let cache = CitiesCache::new(dir.path().join("does-not-exist.tsv"));
    assert_eq!(cache.len(), 0);
    assert!(cache.nearest(52.0, 13.0).is_none());
}

#[test]
fn exact_city_coordinates_return_that_city() {
    let dir = TempDir::new().unwrap();
    let cache = CitiesCache::new(write_file(&dir, "cities.tsv", CITIES));
    for (lat, lng, name) in [
        (52.5200, 13.4050, "Berlin"),
        (40.7128, -74.0060, "New York"),
        (35.6762, 139.6503, "Tokyo"),
    ] {
        assert_eq!(cache.nearest(lat, lng).unwrap().name, name);
    }
}

#[test]
fn nearby_point_resolves_to_closest_city() {
    let dir = TempDir::new().unwrap();
    let cache = CitiesCache::new(write_file(&dir, "cities.tsv", CITIES));
    // Potsdam is a short hop from Berlin.
    assert_eq!(cache.nearest(52.3906, 13.0645).unwrap().name, "Berlin");
    // Newark is across the river from New York.
    assert_eq!(cache.nearest(40.7357, -74.1724).unwrap().name, "New York");
}

#[test]
fn repeated_queries_are_deterministic() {
    let dir = TempDir::new().unwrap();
    let cache = CitiesCache::new(write_file(&dir, "cities.tsv", CITIES));
    let first = cache.nearest(45.0, 5.0).unwrap();
    for _ in 0..10 {
        assert_eq!(cache.nearest(45.0, 5.0).unwrap(), first);
    }
}

#[test]
fn index_is_built_lazily_on_first_query() {
    let dir = TempDir::new().unwrap();
    let cache = CitiesCache::new(write_file(&dir, "cities.tsv", CITIES));
    assert!(!cache.index_built());
    let _ = cache.nearest(50.0, 10.0);
    assert!(cache.index_built());
}

#[test]
fn invalid_coordinates_are_rejected() {
    let dir = TempDir::new().unwrap();
    let cache = CitiesCache::new(write_file(&dir, "cities.tsv", CITIES));
    assert!(cache.nearest(f64::NAN, 0.0).is_none());
    assert!(cache.nearest(0.0, f64::INFINITY).is_none());
    assert!(cache.nearest(91.0, 0.0).is_none());
    assert!(cache.nearest(0.0, -181.0).is_none());
}

#[test]
fn clear_reloads_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cities.tsv", "Berlin\t52.52\t13.405\tDE\tBE\t1\n");
    let cache = CitiesCache::new(path.clone());
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.nearest(0.0, 0.0).unwrap().name, "Berlin");

    std::fs::write(
        &path,
        "Berlin\t52.52\t13.405\tDE\tBE\t1\nParis\t48.8566\t2.3522\tFR\t11\t2\n",
    )
    .unwrap();
    // Still the old table until an explicit clear.
    assert_eq!(cache.len(), 1);
    cache.clear();
    assert_eq!(cache.len(), 2);
    assert!(!cache.index_built());
    assert_eq!(cache.nearest(48.8566, 2.3522).unwrap().name, "Paris");
}

#[test]
fn admin1_lookup_and_malformed_lines() {
    let dir = TempDir::new().unwrap();
    let content = "\
US.CA\tCalifornia
DE.BE\tBerlin
no-tab-here
\tEmpty Code
US.TX\tTexas
";
    let cache = Admin1Cache::new(write_file(&dir, "admin1.tsv", content));
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.name_for("US", "CA").as_deref(), Some("California"));
    assert_eq!(cache.name_for("US", "WA"), None);
    assert_eq!(cache.name_for("", "CA"), None);
}

#[test]
fn geo_cache_resolves_admin1_name() {
    let dir = TempDir::new().unwrap();
    let cities = write_file(&dir, "cities.tsv", CITIES);
    let admin1 = write_file(&dir, "admin1.tsv", "DE.BE\tBerlin\nUS.NY\tNew York\n");
    let slugs = write_file(&dir, "slugs.json", "{}");
    let geo = GeoCache::new(cities, admin1, slugs);

    let nearest = geo.nearest_city_resolved(52.5, 13.4).unwrap();
    assert_eq!(nearest.name, "Berlin");
    assert_eq!(nearest.admin1_name.as_deref(), Some("Berlin"));

    // Tokyo's admin1 code is absent from the table; the name is simply None.
    let tokyo = geo.nearest_city_resolved(35.7, 139.6).unwrap();
    assert_eq!(tokyo.name, "Tokyo");
    assert_eq!(tokyo.admin1_name, None);
}
