//! Cell comparison for sortable tables.
//!
//! Cells are numeric when the text left after removing everything but digits,
//! `.` and `-` starts with a number, so `"$1,200"` is `1200` and `"v2 users"`
//! is `2`. Numeric cells order before text cells; text cells use a collation
//! that ignores case and accents at the first level.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        match numeric_value(text) {
            Some(number) => CellValue::Number(number),
            None => CellValue::Text(text.to_string()),
        }
    }
}

pub fn compare(a: &str, b: &str, direction: SortDirection) -> Ordering {
    compare_values(&CellValue::parse(a), &CellValue::parse(b), direction)
}

pub fn compare_values(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
        (CellValue::Number(_), CellValue::Text(_)) => Ordering::Less,
        (CellValue::Text(_), CellValue::Number(_)) => Ordering::Greater,
        (CellValue::Text(x), CellValue::Text(y)) => collate(x, y),
    };
    direction.apply(ordering)
}

/// Numeric reading of a cell: strip to `[0-9.-]`, then take the longest
/// prefix that forms a decimal number.
pub fn numeric_value(text: &str) -> Option<f64> {
    let stripped: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    longest_number_prefix(&stripped)
}

fn longest_number_prefix(stripped: &str) -> Option<f64> {
    let bytes = stripped.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    stripped[..end].trim_end_matches('.').parse::<f64>().ok()
}

/// Three-level collation: base letters, then accents, then case
/// (lowercase first), with the raw text as a final tie-break.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(&base_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

fn base_key(text: &str) -> String {
    text.nfd()
        .filter(|ch| !unicode_normalization::char::is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

fn accent_key(text: &str) -> String {
    text.nfd().flat_map(char::to_lowercase).collect()
}

fn case_key(text: &str) -> Vec<bool> {
    text.chars().map(char::is_uppercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sorted(cells: &[&str], direction: SortDirection) -> Vec<String> {
        let mut values: Vec<String> = cells.iter().map(|cell| cell.to_string()).collect();
        values.sort_by(|a, b| compare(a, b, direction));
        values
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(compare("10", "9", SortDirection::Ascending), Ordering::Greater);
        assert_eq!(compare("10", "9", SortDirection::Descending), Ordering::Less);
        assert_eq!(compare("$1,200", "$950", SortDirection::Ascending), Ordering::Greater);
        assert_eq!(compare("-3", "2", SortDirection::Ascending), Ordering::Less);
    }

    #[test]
    fn numbers_sort_before_text() {
        assert_eq!(
            sorted(&["10", "9", "abc"], SortDirection::Ascending),
            vec!["9", "10", "abc"]
        );
        assert_eq!(
            sorted(&["10", "9", "abc"], SortDirection::Descending),
            vec!["abc", "10", "9"]
        );
    }

    #[test]
    fn partially_numeric_text_counts_as_number() {
        assert_eq!(numeric_value("v2 users"), Some(2.0));
        assert_eq!(
            sorted(&["v2 users", "10", "1"], SortDirection::Ascending),
            vec!["1", "v2 users", "10"]
        );
    }

    #[test]
    fn numeric_prefix_rules() {
        assert_eq!(numeric_value("1-2"), Some(1.0));
        assert_eq!(numeric_value("1.2.3"), Some(1.2));
        assert_eq!(numeric_value(".5"), Some(0.5));
        assert_eq!(numeric_value("7."), Some(7.0));
        assert_eq!(numeric_value("2024-01-15"), Some(2024.0));
        assert_eq!(numeric_value("-"), None);
        assert_eq!(numeric_value("."), None);
        assert_eq!(numeric_value("n/a"), None);
        assert_eq!(numeric_value(""), None);
    }

    #[test]
    fn text_collation_ignores_case_then_accents() {
        assert_eq!(
            sorted(&["cherry", "Banana", "apple"], SortDirection::Ascending),
            vec!["apple", "Banana", "cherry"]
        );
        assert_eq!(
            sorted(&["éclair", "Eclair", "eclair"], SortDirection::Ascending),
            vec!["eclair", "Eclair", "éclair"]
        );
    }

    #[test]
    fn cells_are_trimmed_before_comparison() {
        assert_eq!(compare("  beta ", "beta", SortDirection::Ascending), Ordering::Equal);
        assert_eq!(CellValue::parse(" 42 "), CellValue::Number(42.0));
    }

    #[test]
    fn toggled_direction_reverses() {
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
        assert!(SortDirection::Descending.toggled().is_ascending());
    }
}
