use crate::models::Venue;

/// One row of the venues listing page / CLI table.
#[derive(Clone)]
pub struct VenueRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub city: String,
    pub country: String,
}

impl VenueRow {
    pub fn from_venue(v: &Venue) -> Self {
        VenueRow {
            id: v.id.clone(),
            name: v.name().to_string(),
            category: crate::utils::format_category(v.category_or_tag()),
            city: v.tag("addr:city").unwrap_or("").to_string(),
            country: v.tag("addr:country").unwrap_or("").to_string(),
        }
    }
}

/// Everything the venue detail page needs, precomputed.
#[derive(Clone)]
pub struct VenueView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub map_url: String,
    pub tag_rows: Vec<(String, String)>,
    pub enriched_display: String,
}

impl VenueView {
    pub fn from_venue(v: &Venue, address: String) -> Self {
        let mut tag_rows: Vec<(String, String)> = v
            .tags
            .iter()
            .map(|(k, val)| (k.clone(), val.clone()))
            .collect();
        tag_rows.sort_by(|a, b| a.0.cmp(&b.0));
        VenueView {
            id: v.id.clone(),
            name: v.name().to_string(),
            category: crate::utils::format_category(v.category_or_tag()),
            subcategory: v.subcategory.clone().unwrap_or_default(),
            address,
            latitude: v.latitude,
            longitude: v.longitude,
            map_url: format!(
                "https://www.openstreetmap.org/?mlat={}&mlon={}#map=18/{}/{}",
                v.latitude, v.longitude, v.latitude, v.longitude
            ),
            tag_rows,
            enriched_display: v
                .enriched_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".into()),
        }
    }
}
