/// Canonicalize a string into a URL slug: lowercase ASCII alphanumerics with
/// single dashes, no leading or trailing dash.
pub fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_dash = true;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_and_dashes() {
        assert_eq!(slugify("Coffee in Berlin"), "coffee-in-berlin");
    }

    #[test]
    fn collapses_runs_of_separators() {
        assert_eq!(slugify("  cafes --  NYC  "), "cafes-nyc");
    }

    #[test]
    fn strips_non_ascii() {
        assert_eq!(slugify("Café São Paulo"), "caf-s-o-paulo");
    }

    #[test]
    fn idempotent_on_canonical_input() {
        assert_eq!(slugify("coffee-in-berlin"), "coffee-in-berlin");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify(""), "");
    }
}
