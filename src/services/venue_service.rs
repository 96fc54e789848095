use hex::encode as hex_encode;
use rand::RngCore;

use crate::geo::VenueStore;
use crate::models::Venue;

#[derive(Clone, Debug, Default)]
pub struct SearchFilter {
    pub q: String,
    pub category: String,
    pub country: String,
    pub limit: Option<usize>,
}

impl SearchFilter {
    pub fn is_empty(&self) -> bool {
        self.q.is_empty() && self.category.is_empty() && self.country.is_empty()
    }
}

/// Filter the venue table. Text queries match the name and every tag value,
/// case-insensitively; category and country are exact (case-insensitive)
/// matches. Results come back in table order, so repeated searches are stable.
pub fn search_venues(store: &VenueStore, filter: &SearchFilter) -> Vec<Venue> {
    let q = filter.q.trim().to_lowercase();
    let category = filter.category.trim().to_lowercase();
    let country = filter.country.trim().to_uppercase();
    let mut out = Vec::new();
    for venue in store.all() {
        if !category.is_empty() && venue.category_or_tag().to_lowercase() != category {
            continue;
        }
        if !country.is_empty()
            && venue.tag("addr:country").map(|c| c.to_uppercase()) != Some(country.clone())
        {
            continue;
        }
        if !q.is_empty() && !matches_text(&venue, &q) {
            continue;
        }
        out.push(venue);
        if let Some(limit) = filter.limit {
            if out.len() >= limit {
                break;
            }
        }
    }
    out
}

fn matches_text(venue: &Venue, q: &str) -> bool {
    if venue.name().to_lowercase().contains(q) || venue.id.to_lowercase().contains(q) {
        return true;
    }
    venue.tags.values().any(|v| v.to_lowercase().contains(q))
}

/// Fresh venue id for records created locally (synced venues keep their
/// upstream ids). Collisions are retried against the store.
pub fn allocate_venue_id(store: &VenueStore) -> String {
    loop {
        let mut b = [0u8; 4];
        rand::rngs::OsRng.fill_bytes(&mut b);
        let id = format!("wp-{}", hex_encode(b));
        if !store.contains(&id) {
            return id;
        }
    }
}

/// Parse the "one `key=value` per line" tag textarea of the edit form.
pub fn parse_tag_lines(raw: &str) -> std::collections::HashMap<String, String> {
    let mut tags = std::collections::HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            let k = k.trim();
            let v = v.trim();
            if !k.is_empty() && !v.is_empty() {
                tags.insert(k.to_string(), v.to_string());
            }
        }
    }
    tags
}

/// Inverse of `parse_tag_lines`, for prefilling the edit form.
pub fn tag_lines(venue: &Venue) -> String {
    let mut pairs: Vec<(&String, &String)> = venue.tags.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tag_lines_and_skips_garbage() {
        let tags = parse_tag_lines("name=Cafe One\n\naddr:city=Berlin\nnot a pair\n =x\n");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("name").map(|s| s.as_str()), Some("Cafe One"));
        assert_eq!(tags.get("addr:city").map(|s| s.as_str()), Some("Berlin"));
    }

    #[test]
    fn tag_lines_round_trip_sorted() {
        let mut venue = Venue::new("v1".into(), 0.0, 0.0);
        venue.tags.insert("name".into(), "Cafe".into());
        venue.tags.insert("addr:city".into(), "Berlin".into());
        assert_eq!(tag_lines(&venue), "addr:city=Berlin\nname=Cafe");
    }
}
