use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_\s-]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHEN_RUN: Regex = Regex::new(r"--+").unwrap();
}

pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUN.replace_all(&stripped, "-");
    HYPHEN_RUN.replace_all(&hyphenated, "-").into_owned()
}

/// Slug to write into the slug field when the title loses focus, or `None`
/// when the field already has a value or the title is empty.
pub fn slug_on_blur(title: &str, current_slug: &str) -> Option<String> {
    if title.is_empty() || !current_slug.is_empty() {
        return None;
    }
    Some(slugify(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_punctuation_and_collapses_hyphens() {
        assert_eq!(slugify("Hello, World! -- Test"), "hello-world-test");
        assert_eq!(slugify("Rust   for  Beginners"), "rust-for-beginners");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn slugify_keeps_edge_hyphens_and_drops_non_ascii() {
        assert_eq!(slugify(" Café menu "), "-caf-menu-");
        assert_eq!(slugify("2024: Year in review"), "2024-year-in-review");
    }

    #[test]
    fn blur_only_fills_an_empty_slug() {
        assert_eq!(slug_on_blur("New Page", ""), Some("new-page".into()));
        assert_eq!(slug_on_blur("New Page", "custom"), None);
        assert_eq!(slug_on_blur("", ""), None);
    }
}
