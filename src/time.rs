//! Calendar string conversion to the two continuous time scales used by the
//! calibration models.
//!
//! - Scale A: seconds since 1979-01-01T00:00:00 with a fixed +3600 s
//!   correction (the 2014 model).
//! - Scale B: TAI seconds since 1958-01-01T00:00:00, i.e. UTC seconds plus a
//!   fixed 37 s offset (the 2023 model).
//!
//! The two scales are separate types so a value on one can never be compared
//! against a value on the other.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::{ParseError, ValidationError};

/// 1979-01-01T00:00:00 - 1970-01-01T00:00:00 in seconds
pub const SCALE_A_EPOCH_UNIX_SECONDS: f64 = 283_996_800.0;

/// Fixed correction added to every Scale A value
pub const SCALE_A_CORRECTION_SECONDS: f64 = 3600.0;

/// 1970-01-01T00:00:00 - 1958-01-01T00:00:00 in seconds
pub const TAI_EPOCH_OFFSET_SECONDS: f64 = 378_691_200.0;

/// TAI - UTC
pub const TAI_UTC_OFFSET_SECONDS: f64 = 37.0;

/// Start of normal EIS science operations
pub const NORMAL_OPERATIONS_START: &str = "2006-10-20T10:20:00.000";

/// Scale B value of [`NORMAL_OPERATIONS_START`]
const NORMAL_OPERATIONS_START_TAI: f64 = 1_540_030_837.0;

const ISO_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

static NON_TIME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.]").expect("valid regex"));

static COMPACT_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8} [0-9]{6}$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleA(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleB(pub f64);

impl ScaleA {
    pub fn seconds(self) -> f64 {
        self.0
    }

    /// Elapsed Julian years from `reference` to `self`.
    pub fn years_since(self, reference: ScaleA) -> f64 {
        (self.0 - reference.0) / (86400.0 * 365.25)
    }
}

impl ScaleB {
    pub fn seconds(self) -> f64 {
        self.0
    }
}

impl fmt::Display for ScaleA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} s (scale A)", self.0)
    }
}

impl fmt::Display for ScaleB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} s (TAI)", self.0)
    }
}

/// Converts an ISO-8601 timestamp to Scale A.
///
/// Naive timestamps are read as UTC; a trailing `Z` or `±HH:MM` offset is
/// honoured. Fractional seconds are kept.
pub fn to_scale_a(timestamp: &str) -> Result<ScaleA, ParseError> {
    let unix = unix_seconds(timestamp.trim())?;
    Ok(ScaleA(
        unix - SCALE_A_EPOCH_UNIX_SECONDS + SCALE_A_CORRECTION_SECONDS,
    ))
}

/// Converts a calendar string to TAI seconds since 1958-01-01 (Scale B).
///
/// Punctuation other than `.` is stripped, fractional seconds are dropped and
/// a `T` separator becomes a space, leaving `YYYYMMDD HHMMSS`.
pub fn to_scale_b(timestamp: &str) -> Result<ScaleB, ParseError> {
    let cleaned = NON_TIME_CHARS.replace_all(timestamp.trim(), "");
    let whole_seconds = cleaned.split('.').next().unwrap_or_default();
    let normalized = whole_seconds.replace('T', " ");

    if !COMPACT_TIMESTAMP.is_match(&normalized) {
        return Err(ParseError::Timestamp {
            input: timestamp.to_string(),
            reason: format!("'{}' does not match YYYYMMDD HHMMSS", normalized),
        });
    }

    let dt = NaiveDateTime::parse_from_str(&normalized, "%Y%m%d %H%M%S").map_err(|e| {
        ParseError::Timestamp {
            input: timestamp.to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(ScaleB(
        seconds_since_unix_epoch(dt) + TAI_EPOCH_OFFSET_SECONDS + TAI_UTC_OFFSET_SECONDS,
    ))
}

pub fn normal_operations_start() -> ScaleB {
    ScaleB(NORMAL_OPERATIONS_START_TAI)
}

/// Returns the only date of `dates`.
pub fn single_date<S: AsRef<str>>(dates: &[S]) -> Result<&str, ValidationError> {
    match dates {
        [date] => Ok(date.as_ref()),
        _ => Err(ValidationError::DateCount(dates.len())),
    }
}

fn unix_seconds(timestamp: &str) -> Result<f64, ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Ok(seconds_since_unix_epoch(dt.naive_utc()));
    }

    for format in ISO_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, format) {
            return Ok(seconds_since_unix_epoch(dt));
        }
    }

    NaiveDate::parse_from_str(timestamp, "%Y-%m-%d")
        .map(|date| seconds_since_unix_epoch(date.and_time(NaiveTime::MIN)))
        .map_err(|e| ParseError::Timestamp {
            input: timestamp.to_string(),
            reason: e.to_string(),
        })
}

fn seconds_since_unix_epoch(dt: NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn epoch_seconds(year: i32) -> f64 {
        let dt = NaiveDate::from_ymd_opt(year, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        seconds_since_unix_epoch(dt)
    }

    #[test]
    fn test_epoch_constants() {
        assert_eq!(epoch_seconds(1979), SCALE_A_EPOCH_UNIX_SECONDS);
        assert_eq!(-epoch_seconds(1958), TAI_EPOCH_OFFSET_SECONDS);
        assert_eq!(
            to_scale_b(NORMAL_OPERATIONS_START).unwrap(),
            normal_operations_start()
        );
    }

    #[test]
    fn test_scale_a_at_epoch() {
        let a = to_scale_a("1979-01-01T00:00:00").unwrap();
        assert_eq!(a.seconds(), SCALE_A_CORRECTION_SECONDS);
    }

    #[test]
    fn test_scale_a_accepted_formats() {
        let iso = to_scale_a("2012-05-01T12:30:00").unwrap();
        assert_eq!(to_scale_a("2012-05-01 12:30:00").unwrap(), iso);
        assert_eq!(to_scale_a("2012-05-01T12:30").unwrap(), iso);
        assert_eq!(to_scale_a("2012-05-01T12:30:00Z").unwrap(), iso);
        assert_eq!(to_scale_a("2012-05-01T14:30:00+02:00").unwrap(), iso);

        let midnight = to_scale_a("2012-05-01").unwrap();
        assert_eq!(iso.seconds() - midnight.seconds(), 12.5 * 3600.0);

        let fractional = to_scale_a("2012-05-01T12:30:00.250000").unwrap();
        assert_relative_eq!(fractional.seconds() - iso.seconds(), 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_scale_a_rejects_malformed() {
        assert!(to_scale_a("not a date").is_err());
        assert!(to_scale_a("2012-13-01T00:00:00").is_err());
        assert!(to_scale_a("20120501 123000").is_err());
    }

    #[test]
    fn test_years_since() {
        let t0 = to_scale_a("2001-01-01T00:00:00").unwrap();
        let t1 = to_scale_a("2002-01-01T06:00:00").unwrap();
        assert_relative_eq!(t1.years_since(t0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_b_at_unix_epoch() {
        let b = to_scale_b("1970-01-01T00:00:00").unwrap();
        assert_eq!(b.seconds(), TAI_EPOCH_OFFSET_SECONDS + TAI_UTC_OFFSET_SECONDS);
    }

    #[test]
    fn test_scale_b_normalization() {
        let expected = to_scale_b("20061020 102000").unwrap();
        assert_eq!(to_scale_b("2006-10-20T10:20:00").unwrap(), expected);
        assert_eq!(to_scale_b("2006-10-20T10:20:00.000").unwrap(), expected);
        assert_eq!(to_scale_b("2006-10-20T10:20:00.999Z").unwrap(), expected);
        assert_eq!(to_scale_b("2006/10/20 10:20:00").unwrap(), expected);
    }

    #[test]
    fn test_scale_b_rejects_malformed() {
        assert!(to_scale_b("2006-10-20").is_err());
        assert!(to_scale_b("2006-10-20T10:20").is_err());
        assert!(to_scale_b("20-Oct-2006 10:20:00").is_err());
        assert!(to_scale_b("2006-13-20T10:20:00").is_err());
        assert!(to_scale_b("").is_err());
    }

    #[test]
    fn test_conversions_are_pure_and_monotonic() {
        let dates = [
            "2006-10-20T10:20:00",
            "2006-10-20T10:20:01",
            "2010-03-01T00:00:00",
            "2023-05-04T23:59:59",
        ];
        let a: Vec<f64> = dates.iter().map(|d| to_scale_a(d).unwrap().0).collect();
        let b: Vec<f64> = dates.iter().map(|d| to_scale_b(d).unwrap().0).collect();

        assert!(a.windows(2).all(|w| w[0] < w[1]));
        assert!(b.windows(2).all(|w| w[0] < w[1]));

        for (date, (sa, sb)) in dates.iter().zip(a.iter().zip(b.iter())) {
            assert_eq!(to_scale_a(date).unwrap().0, *sa);
            assert_eq!(to_scale_b(date).unwrap().0, *sb);
        }
    }

    #[test]
    fn test_single_date() {
        assert_eq!(single_date(&["2010-01-01T00:00:00"]).unwrap(), "2010-01-01T00:00:00");
        assert_eq!(
            single_date::<&str>(&[]).unwrap_err(),
            ValidationError::DateCount(0)
        );
        assert_eq!(
            single_date(&["2010-01-01", "2011-01-01"]).unwrap_err(),
            ValidationError::DateCount(2)
        );
    }
}
