use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an entry timestamp into local wall-clock time at `offset`.
///
/// RFC 3339 instants are shifted into `offset`; naive date-times are taken as
/// already local, and a bare date is local midnight.
pub fn parse_local_datetime(value: &str, offset: &FixedOffset, field: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(offset).naive_local());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("unrecognised timestamp {value:?}"))
        .with_context(|| format!("failed to parse {field}"))
}

/// Today's date as seen from `offset`.
pub fn today_at(offset: &FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(offset).date_naive()
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("failed to parse {field} (expected YYYY-MM-DD)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn instants_shift_into_the_local_offset() {
        let local = parse_local_datetime("2024-03-04T23:30:00Z", &offset(2), "createdAt").unwrap();
        assert_eq!(local.to_string(), "2024-03-05 01:30:00");

        let local =
            parse_local_datetime("2024-03-04T23:30:00.123+00:00", &offset(-5), "createdAt").unwrap();
        assert_eq!(local.date().to_string(), "2024-03-04");
    }

    #[test]
    fn naive_values_are_already_local() {
        let local = parse_local_datetime("2024-03-04T08:15:00", &offset(9), "createdAt").unwrap();
        assert_eq!(local.to_string(), "2024-03-04 08:15:00");

        let midnight = parse_local_datetime("2024-03-04", &offset(9), "createdAt").unwrap();
        assert_eq!(midnight.to_string(), "2024-03-04 00:00:00");
    }

    #[test]
    fn garbage_is_an_error() {
        let err = parse_local_datetime("yesterday", &offset(0), "createdAt").unwrap_err();
        assert!(err.to_string().contains("createdAt"));
    }
}
