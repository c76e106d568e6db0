//! Helpers shared by the route handlers.

use serde::Serialize;

/// Body of the confirmation responses, e.g. `{"message": "Book deleted"}`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

/// Stand-in for a path id that is not an integer. MySQL compares such text
/// as 0, and `AUTO_INCREMENT` never hands out 0.
pub const UNMATCHED_ID: i64 = 0;

/// Parse a path id. Text that is not an integer can never match a row, so
/// callers treat `None` like an id with no row behind it.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_parse() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("-3"), Some(-3));
    }

    #[test]
    fn non_numeric_ids_do_not() {
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("4.5"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("1abc"), None);
    }
}
