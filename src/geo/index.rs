use crate::models::City;

/// Static nearest-neighbor index over city coordinates.
///
/// Coordinates are projected onto the unit sphere and stored in a k-d tree
/// laid out in a flat array (the median of every subrange is that subrange's
/// split node). Chordal distance on the unit sphere orders points exactly
/// like great-circle distance, so no haversine evaluation is needed during
/// the search. The tree is immutable once built.
pub struct CityIndex {
    points: Vec<[f64; 3]>,
    ids: Vec<usize>,
}

impl CityIndex {
    pub fn build(cities: &[City]) -> Self {
        let mut entries: Vec<([f64; 3], usize)> = cities
            .iter()
            .enumerate()
            .map(|(i, c)| (unit_vector(c.latitude, c.longitude), i))
            .collect();
        build_range(&mut entries, 0);
        CityIndex {
            points: entries.iter().map(|e| e.0).collect(),
            ids: entries.iter().map(|e| e.1).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Index (into the original city slice) of the nearest city.
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Option<usize> {
        if self.ids.is_empty() {
            return None;
        }
        let query = unit_vector(latitude, longitude);
        let mut best = (f64::INFINITY, usize::MAX);
        self.search(0, self.points.len(), 0, &query, &mut best);
        Some(best.1)
    }

    fn search(&self, lo: usize, hi: usize, depth: usize, query: &[f64; 3], best: &mut (f64, usize)) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let d = dist_sq(&self.points[mid], query);
        // Ties resolve to the lowest original index so queries are deterministic.
        if d < best.0 || (d == best.0 && self.ids[mid] < best.1) {
            *best = (d, self.ids[mid]);
        }
        let axis = depth % 3;
        let delta = query[axis] - self.points[mid][axis];
        let (near, far) = if delta < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };
        self.search(near.0, near.1, depth + 1, query, best);
        if delta * delta <= best.0 {
            self.search(far.0, far.1, depth + 1, query, best);
        }
    }
}

fn build_range(entries: &mut [([f64; 3], usize)], depth: usize) {
    if entries.len() <= 1 {
        return;
    }
    let axis = depth % 3;
    let mid = entries.len() / 2;
    entries.select_nth_unstable_by(mid, |a, b| {
        a.0[axis].total_cmp(&b.0[axis]).then(a.1.cmp(&b.1))
    });
    let (left, rest) = entries.split_at_mut(mid);
    build_range(left, depth + 1);
    build_range(&mut rest[1..], depth + 1);
}

fn unit_vector(latitude: f64, longitude: f64) -> [f64; 3] {
    let lat = latitude.to_radians();
    let lng = longitude.to_radians();
    [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
}

fn dist_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, lat: f64, lng: f64) -> City {
        City {
            name: name.into(),
            latitude: lat,
            longitude: lng,
            country: "XX".into(),
            admin1: "00".into(),
            population: 0,
        }
    }

    fn fixture() -> Vec<City> {
        vec![
            city("Berlin", 52.52, 13.405),
            city("Paris", 48.8566, 2.3522),
            city("London", 51.5074, -0.1278),
            city("New York", 40.7128, -74.006),
            city("Tokyo", 35.6762, 139.6503),
            city("Sydney", -33.8688, 151.2093),
            city("Sao Paulo", -23.5505, -46.6333),
            city("Cairo", 30.0444, 31.2357),
            city("Anchorage", 61.2181, -149.9003),
            city("Auckland", -36.8485, 174.7633),
        ]
    }

    fn brute_force(cities: &[City], lat: f64, lng: f64) -> usize {
        let q = unit_vector(lat, lng);
        let mut best = (f64::INFINITY, usize::MAX);
        for (i, c) in cities.iter().enumerate() {
            let d = dist_sq(&unit_vector(c.latitude, c.longitude), &q);
            if d < best.0 {
                best = (d, i);
            }
        }
        best.1
    }

    #[test]
    fn empty_index_returns_none() {
        let index = CityIndex::build(&[]);
        assert!(index.nearest(0.0, 0.0).is_none());
    }

    #[test]
    fn exact_coordinates_return_that_city() {
        let cities = fixture();
        let index = CityIndex::build(&cities);
        for (i, c) in cities.iter().enumerate() {
            assert_eq!(index.nearest(c.latitude, c.longitude), Some(i), "{}", c.name);
        }
    }

    #[test]
    fn matches_linear_scan_on_a_grid() {
        let cities = fixture();
        let index = CityIndex::build(&cities);
        let mut lat = -85.0;
        while lat <= 85.0 {
            let mut lng = -180.0;
            while lng <= 180.0 {
                let got = index.nearest(lat, lng).unwrap();
                let want = brute_force(&cities, lat, lng);
                assert_eq!(got, want, "query ({}, {})", lat, lng);
                lng += 17.0;
            }
            lat += 13.0;
        }
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let cities = fixture();
        let index = CityIndex::build(&cities);
        let first = index.nearest(47.3, 8.5);
        for _ in 0..5 {
            assert_eq!(index.nearest(47.3, 8.5), first);
        }
    }

    #[test]
    fn antimeridian_neighbors_resolve_correctly() {
        // Chordal distance does not care about the longitude wrap.
        let cities = vec![city("West", 0.0, 179.5), city("East", 0.0, -179.5)];
        let index = CityIndex::build(&cities);
        assert_eq!(index.nearest(0.0, 179.9), Some(0));
        assert_eq!(index.nearest(0.0, -179.9), Some(1));
    }
}
