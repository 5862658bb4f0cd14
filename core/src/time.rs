//! Time related utils.

use crate::{Error, Result};

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    chrono::Utc::now()
}

/// Parse time from RFC3339.
///
/// All of them are valid time:
///
/// - `2022-03-13T07:20:04Z`
/// - `2022-03-01T08:12:34+00:00`
/// - `2022-03-01T08:12:34.00+00:00`
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|v| v.with_timezone(&chrono::Utc))
        .map_err(|e| {
            Error::unexpected("failed to parse RFC 3339 time")
                .with_source(e)
                .with_context(format!("value: {s}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn test_time() -> DateTime {
        chrono::Utc
            .with_ymd_and_hms(2022, 3, 1, 8, 12, 34)
            .single()
            .expect("valid time")
    }

    #[test_case("2022-03-01T08:12:34Z"; "utc")]
    #[test_case("2022-03-01T08:12:34+00:00"; "offset")]
    #[test_case("2022-03-01T08:12:34.00+00:00"; "fraction")]
    fn test_parse_rfc3339(input: &str) {
        assert_eq!(parse_rfc3339(input).expect("must be valid"), test_time());
    }

    #[test]
    fn test_parse_rfc3339_invalid() {
        assert!(parse_rfc3339("").is_err());
        assert!(parse_rfc3339("yesterday").is_err());
    }
}
