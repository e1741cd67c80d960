//! Conversion from Photos' on-disk timestamps to UTC date-times.
//!
//! The catalog stores timestamps as seconds relative to Apple's reference
//! date, 2001-01-01T00:00:00 UTC, not the Unix epoch. Values may be
//! fractional or negative.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// The zero point for timestamps stored in the catalog.
fn apple_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap()
}

/// Convert a stored timestamp to UTC.
///
/// SQL NULL maps to `None`. A stored 0.0 is a real instant (the reference
/// date itself), not a missing value.
pub fn from_apple_epoch(seconds: Option<f64>) -> Option<DateTime<Utc>> {
    let secs = seconds?;
    let millis = (secs * 1000.0).round() as i64;
    Some(apple_epoch() + Duration::milliseconds(millis))
}
