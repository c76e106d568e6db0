use serde::Serialize;
use time::macros::format_description;

/// A book as returned by the read queries, joined with its publisher name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: i64,
    pub name: String,
    /// Always `YYYY-MM-DD`
    pub date: String,
    /// `None` when the publisher row is missing
    pub publisher: Option<String>,
    pub publisher_id: i64,
}

/// Column values written by book inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub publisher_id: i64,
    pub name: String,
    /// Passed through to storage unchecked
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPublisher {
    pub name: String,
    pub address: String,
    pub contact: String,
}

pub(crate) fn format_date(date: time::Date) -> Result<String, time::error::Format> {
    date.format(format_description!("[year]-[month]-[day]"))
}

#[cfg(any(test, feature = "memory"))]
pub(crate) fn parse_date(value: &str) -> Result<time::Date, time::error::Parse> {
    time::Date::parse(value, format_description!("[year]-[month]-[day]"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn dates_render_zero_padded() {
        assert_eq!(format_date(date!(2024 - 01 - 01)).unwrap(), "2024-01-01");
        assert_eq!(format_date(date!(2023 - 7 - 4)).unwrap(), "2023-07-04");
    }

    #[test]
    fn parse_rejects_non_calendar_dates() {
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("yesterday").is_err());
        assert_eq!(parse_date("2024-02-29").unwrap(), date!(2024 - 02 - 29));
    }

    #[test]
    fn book_serializes_missing_publisher_as_null() {
        let book = Book {
            id: 1,
            name: "Orphan".to_string(),
            date: "2020-05-01".to_string(),
            publisher: None,
            publisher_id: 9,
        };
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["publisher"], serde_json::Value::Null);
        assert_eq!(value["publisher_id"], 9);
    }
}
