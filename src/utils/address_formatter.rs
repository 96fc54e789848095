use std::collections::HashMap;

/// Assemble a display address from venue tags plus a resolved admin1 name.
/// Missing parts are dropped, never rendered as placeholders.
pub fn format_address(tags: &HashMap<String, String>, admin1_name: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::new();
    let street = match (tags.get("addr:housenumber"), tags.get("addr:street")) {
        (Some(num), Some(street)) => format!("{} {}", num, street),
        (None, Some(street)) => street.clone(),
        _ => String::new(),
    };
    if !street.is_empty() {
        parts.push(street);
    }
    if let Some(city) = tags.get("addr:city") {
        parts.push(city.clone());
    }
    if let Some(name) = admin1_name {
        parts.push(name.to_string());
    } else if let Some(state) = tags.get("addr:state") {
        parts.push(state.clone());
    }
    if let Some(country) = tags.get("addr:country") {
        parts.push(country.clone());
    }
    parts.join(", ")
}

pub fn format_category(category: &str) -> String {
    match category.to_lowercase().as_str() {
        "atm" => "ATM".to_string(),
        "cafe" => "Café".to_string(),
        "pub" => "Pub".to_string(),
        "fast_food" => "Fast Food".to_string(),
        "" => "Uncategorized".to_string(),
        other => {
            let mut out = String::with_capacity(other.len());
            for (i, c) in other.replace('_', " ").chars().enumerate() {
                if i == 0 {
                    out.extend(c.to_uppercase());
                } else {
                    out.push(c);
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn full_address() {
        let t = tags(&[
            ("addr:housenumber", "12"),
            ("addr:street", "Main St"),
            ("addr:city", "Springfield"),
            ("addr:country", "US"),
        ]);
        assert_eq!(
            format_address(&t, Some("Illinois")),
            "12 Main St, Springfield, Illinois, US"
        );
    }

    #[test]
    fn partial_address_drops_missing_parts() {
        let t = tags(&[("addr:city", "Springfield")]);
        assert_eq!(format_address(&t, None), "Springfield");
    }

    #[test]
    fn state_tag_used_when_admin1_unresolved() {
        let t = tags(&[("addr:city", "Austin"), ("addr:state", "TX")]);
        assert_eq!(format_address(&t, None), "Austin, TX");
    }

    #[test]
    fn category_display() {
        assert_eq!(format_category("atm"), "ATM");
        assert_eq!(format_category("fast_food"), "Fast Food");
        assert_eq!(format_category("restaurant"), "Restaurant");
        assert_eq!(format_category(""), "Uncategorized");
    }
}
