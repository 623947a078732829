//! Formatting helpers for rendered release data.

use chrono::{DateTime, Utc};

/// Decimal places used for asset sizes unless configured otherwise.
pub const DEFAULT_DECIMALS: usize = 2;

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const STEP: u64 = 1024;

/// Formats a byte count scaled to the largest binary unit that keeps the value at or above 1.
///
/// The value is rounded to `decimals` places and trailing zeros are dropped, so
/// 2 MiB is `"2 MB"` and 1536 bytes is `"1.5 KB"`. Sizes past the terabyte range
/// stay in TB.
///
/// ```
/// use releasepage::format::format_bytes;
///
/// assert_eq!(format_bytes(0, 2), "0 Bytes");
/// assert_eq!(format_bytes(2_097_152, 2), "2 MB");
/// ```
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes;
    while scaled >= STEP && unit < UNITS.len() - 1 {
        scaled /= STEP;
        unit += 1;
    }

    let value = bytes as f64 / (STEP as f64).powi(unit as i32);
    format!("{} {}", trim_decimal(&format!("{:.*}", decimals, value)), UNITS[unit])
}

fn trim_decimal(fixed: &str) -> &str {
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed
    }
}

/// Long-form US English date, e.g. `January 15, 2024`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}
