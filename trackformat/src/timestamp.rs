use crate::FormatError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// ISO-8601 UTC with a trailing 'Z' and microsecond precision
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an ISO-8601 timestamp that may or may not carry zone information.
///
/// Accepts 'Z', '+hh:mm' and '+hhmm' offsets, with or without fractional
/// seconds. Timestamps without a zone are taken to be UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, FormatError> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"] {
        if let Ok(t) = DateTime::parse_from_str(s, fmt) {
            return Ok(t.with_timezone(&Utc));
        }
    }
    let naive = s.strip_suffix('Z').unwrap_or(s);
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(t.and_utc());
        }
    }
    Err(FormatError::Timestamp(s.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn zone_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 7, 25, 18, 27, 22).unwrap();
        assert_eq!(parse_timestamp("2024-07-25T18:27:22Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-07-25T18:27:22").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-07-25T20:27:22+02:00").unwrap(),
            expected
        );
        assert_eq!(parse_timestamp("2024-07-25T20:27:22+0200").unwrap(), expected);
    }

    #[test]
    fn fractional_seconds() {
        let t = parse_timestamp("2024-07-25T18:23:18.35Z").unwrap();
        assert_eq!(t.nanosecond(), 350_000_000);
        let t = parse_timestamp("2024-07-25T18:21:11.337").unwrap();
        assert_eq!(t.nanosecond(), 337_000_000);
    }

    #[test]
    fn formats_with_trailing_z() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let s = format_timestamp(&t);
        assert_eq!(s, "2024-01-02T03:04:05.000000Z");
        assert_eq!(parse_timestamp(&s).unwrap(), t);
    }

    #[test]
    fn garbage() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(FormatError::Timestamp(_))
        ));
    }
}
