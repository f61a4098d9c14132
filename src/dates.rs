//! Measurement date handling.

use crate::error::{Result, XpsError};
use chrono::{Datelike, FixedOffset, NaiveDate, TimeZone};

/// ISO-8601 timestamp for local midnight of a civil date read from `file`
pub fn measured_date(
    file: &str,
    year: i32,
    month: u32,
    day: u32,
    utc_offset_hours: i32,
) -> Result<String> {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| {
        XpsError::configuration(format!("UTC offset out of range: {}h", utc_offset_hours))
    })?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        XpsError::unsupported_value(file, "measured date", format!("{}-{}-{}", year, month, day))
    })?;

    let midnight = date
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .ok_or_else(|| XpsError::unsupported_value(file, "measured date", date.to_string()))?;

    Ok(midnight.to_rfc3339())
}

/// Parse a compact "YYYYMMDD" date into its parts
pub fn split_compact_date(text: &str) -> Option<(i32, u32, u32)> {
    let date = NaiveDate::parse_from_str(text.trim(), "%Y%m%d").ok()?;
    Some((date.year(), date.month(), date.day()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measured_date_iso_format() {
        assert_eq!(
            measured_date("a.vms", 2023, 5, 1, 9).unwrap(),
            "2023-05-01T00:00:00+09:00"
        );
        assert_eq!(
            measured_date("a.vms", 2020, 12, 31, 0).unwrap(),
            "2020-12-31T00:00:00+00:00"
        );
    }

    #[test]
    fn test_invalid_dates() {
        assert!(measured_date("a.vms", 2023, 2, 30, 9).is_err());
        assert!(measured_date("a.vms", 2023, 1, 1, 48).is_err());
    }

    #[test]
    fn test_invalid_date_names_its_file() {
        match measured_date("scan.spe", 2023, 13, 1, 9) {
            Err(XpsError::UnsupportedFormatValue { file, value, .. }) => {
                assert_eq!(file, "scan.spe");
                assert_eq!(value, "2023-13-1");
            }
            other => panic!("Expected UnsupportedFormatValue, got {:?}", other),
        }
    }

    #[test]
    fn test_split_compact_date() {
        assert_eq!(split_compact_date("20230105"), Some((2023, 1, 5)));
        assert_eq!(split_compact_date("unknown"), None);
    }
}
