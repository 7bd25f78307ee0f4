//! Timestamp conversion helpers.

use crate::field::{extract_field, Extracted, FIRST_SEEN, TIMESTAMP};
use chrono::{DateTime, Datelike};

/// Seconds between 1601-01-01 (FILETIME epoch) and 1970-01-01 (Unix epoch).
pub const FILETIME_UNIX_DIFF: i64 = 11_644_473_600;

/// FILETIME resolution is 100 ns.
const TICKS_PER_SECOND: u64 = 10_000_000;

/// Output format for all rendered timestamps.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Converts a Windows FILETIME to Unix seconds.
///
/// Sub-second ticks are truncated before the epoch shift.
///
/// ```rust
/// # use eset_virlog::timestamp::windows_to_unix;
/// assert_eq!(windows_to_unix(131349483990000000), 1490474799);
/// ```
pub fn windows_to_unix(ticks: u64) -> i64 {
    // u64::MAX / TICKS_PER_SECOND fits in an i64
    (ticks / TICKS_PER_SECOND) as i64 - FILETIME_UNIX_DIFF
}

/// Renders Unix seconds as `YYYY-MM-DDTHH:MM:SSZ` in UTC.
///
/// Returns `None` when the value is outside the representable range or
/// falls after year 9999, where `%Y` would stop being four digits.
pub fn unix_timestamp_to_text(seconds: i64) -> Option<String> {
    DateTime::from_timestamp(seconds, 0)
        .filter(|dt| (0..=9999).contains(&dt.year()))
        .map(|dt| dt.format(TIME_FORMAT).to_string())
}

/// Extracts the first-seen time that follows the first-seen marker.
pub fn extract_first_seen(record: &[u8]) -> Extracted {
    extract_field(&FIRST_SEEN, record)
}

/// Extracts the FILETIME stored at bytes 4..12 of a marker-delimited record.
pub fn extract_record_timestamp(record: &[u8]) -> Extracted {
    extract_field(&TIMESTAMP, record)
}
