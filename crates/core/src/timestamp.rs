#![forbid(unsafe_code)]

//! Creation and transaction dates are stored as fractional seconds since
//! 2001-01-01T00:00:00Z rather than the Unix epoch.

use time::OffsetDateTime;

pub const REFERENCE_EPOCH_UNIX_SECONDS: i64 = 978_307_200;

pub fn to_reference_seconds(value: OffsetDateTime) -> f64 {
    let whole = value.unix_timestamp() - REFERENCE_EPOCH_UNIX_SECONDS;
    whole as f64 + f64::from(value.nanosecond()) / 1e9
}

pub fn from_reference_seconds(seconds: f64) -> Option<OffsetDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let offset_nanos = (seconds * 1e9).round() as i128;
    let unix_nanos = offset_nanos + i128::from(REFERENCE_EPOCH_UNIX_SECONDS) * 1_000_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(unix_nanos).ok()
}

pub fn now_reference_seconds() -> f64 {
    to_reference_seconds(OffsetDateTime::now_utc())
}
