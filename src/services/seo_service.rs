use crate::geo::{SlugsCache, VenueStore};
use crate::models::{RegionQuery, Venue};
use crate::utils::{absolute_url, format_category};

/// Venues matching a slug's region query, in table order. Country and
/// category compare case-insensitively; city compares on the `addr:city` tag.
pub fn venues_for_region(store: &VenueStore, query: &RegionQuery) -> Vec<Venue> {
    store
        .all()
        .into_iter()
        .filter(|v| region_matches(v, query))
        .collect()
}

fn region_matches(venue: &Venue, query: &RegionQuery) -> bool {
    if let Some(country) = &query.country {
        match venue.tag("addr:country") {
            Some(c) if c.eq_ignore_ascii_case(country) => {}
            _ => return false,
        }
    }
    if let Some(city) = &query.city {
        match venue.tag("addr:city") {
            Some(c) if c.eq_ignore_ascii_case(city) => {}
            _ => return false,
        }
    }
    if let Some(category) = &query.category {
        if !venue.category_or_tag().eq_ignore_ascii_case(category) {
            return false;
        }
    }
    true
}

/// Page heading for a region page, assembled from whatever the query carries.
pub fn region_title(query: &RegionQuery, slug: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(category) = &query.category {
        parts.push(format_category(category));
    }
    let mut place: Vec<String> = Vec::new();
    if let Some(city) = &query.city {
        place.push(city.clone());
    }
    if let Some(country) = &query.country {
        place.push(country.to_uppercase());
    }
    if !place.is_empty() {
        if parts.is_empty() {
            parts.push("Venues".into());
        }
        parts.push(format!("in {}", place.join(", ")));
    }
    if parts.is_empty() {
        return slug.to_string();
    }
    parts.join(" ")
}

/// Sitemap over the static pages, every visible venue page and every slug page.
pub fn build_sitemap(base_url: &str, venues: &[Venue], slugs: &SlugsCache) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    push_url(&mut out, &absolute_url(base_url, "/venues"));
    for venue in venues {
        push_url(&mut out, &absolute_url(base_url, &format!("/venue/{}", venue.id)));
    }
    for slug in slugs.all_slugs() {
        push_url(&mut out, &absolute_url(base_url, &format!("/d/{}", slug)));
    }
    out.push_str("</urlset>\n");
    out
}

fn push_url(out: &mut String, loc: &str) {
    out.push_str("  <url><loc>");
    out.push_str(&xml_escape(loc));
    out.push_str("</loc></url>\n");
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
