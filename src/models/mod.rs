//! Wire models exchanged with the REST backend and their domain conversions.

pub mod account;
pub mod category;
pub mod config;
pub mod configuration;
pub mod envelope;
pub mod loan_request;
pub mod product;

use chrono::{DateTime, NaiveDateTime};

/// Parses the backend's timestamps, which come either as RFC 3339 or as a
/// naive ISO datetime with optional fractional seconds.
pub fn parse_backend_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_date_formats() {
        let expected = NaiveDateTime::parse_from_str("2025-01-10 10:30:00", "%Y-%m-%d %H:%M:%S")
            .expect("valid fixture");
        assert_eq!(parse_backend_date("2025-01-10T10:30:00Z"), Some(expected));
        assert_eq!(parse_backend_date("2025-01-10T10:30:00"), Some(expected));
        assert_eq!(
            parse_backend_date("2025-01-10T10:30:00.1234567").map(|d| d.date()),
            Some(expected.date())
        );
        assert_eq!(parse_backend_date(""), None);
        assert_eq!(parse_backend_date("yesterday"), None);
    }
}
