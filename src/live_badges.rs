use crate::count_up::{format_grouped, parse_grouped};

/// Rolls above this bring a new notification (30% of rounds).
const NEW_NOTIFICATION_THRESHOLD: f64 = 0.7;

/// Next visitor count text; `roll` is a uniform sample in `[0, 1)`.
pub fn next_visitor_count(current: &str, roll: f64) -> Option<String> {
    let count = parse_grouped(current)?;
    let added = (roll.clamp(0.0, 0.999_999) * 10.0).floor() as i64;
    Some(format_grouped(count.saturating_add(added)))
}

/// Next badge value, or `None` when no notification arrived this round.
pub fn next_badge_count(current: &str, roll: f64) -> Option<i64> {
    if roll <= NEW_NOTIFICATION_THRESHOLD {
        return None;
    }
    let count = crate::services::leading_integer(current.trim()).unwrap_or(0);
    Some(count.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visitor_count_grows_by_up_to_nine() {
        assert_eq!(next_visitor_count("1,200", 0.0), Some("1,200".into()));
        assert_eq!(next_visitor_count("1,200", 0.55), Some("1,205".into()));
        assert_eq!(next_visitor_count("9,995", 0.99), Some("10,004".into()));
        assert_eq!(next_visitor_count("--", 0.5), None);
    }

    #[test]
    fn huge_counts_saturate() {
        assert_eq!(
            next_visitor_count("9,223,372,036,854,775,807", 0.5),
            Some("9,223,372,036,854,775,807".into())
        );
        assert_eq!(next_badge_count("9223372036854775807", 0.9), Some(i64::MAX));
    }

    #[test]
    fn badge_increments_thirty_percent_of_the_time() {
        assert_eq!(next_badge_count("3", 0.5), None);
        assert_eq!(next_badge_count("3", 0.7), None);
        assert_eq!(next_badge_count("3", 0.71), Some(4));
        assert_eq!(next_badge_count("", 0.9), Some(1));
    }
}
