//! Microsecond timeline utilities
//!
//! All positions and offsets in the playback pipeline are expressed in
//! microseconds on a single unified timeline. These helpers convert between
//! units and format values for logging.

use std::time::Duration;

/// Sentinel for an unset or unknown time value.
///
/// Not `i64::MIN` so that negating it cannot overflow.
pub const TIME_UNSET: i64 = i64::MIN + 1;

/// Microseconds per millisecond
pub const US_PER_MS: i64 = 1_000;

/// Microseconds per second
pub const US_PER_SECOND: i64 = 1_000_000;

/// Convert microseconds to milliseconds (truncating)
pub fn us_to_ms(us: i64) -> i64 {
    if us == TIME_UNSET {
        TIME_UNSET
    } else {
        us / US_PER_MS
    }
}

/// Convert milliseconds to microseconds
pub fn ms_to_us(ms: i64) -> i64 {
    if ms == TIME_UNSET {
        TIME_UNSET
    } else {
        ms * US_PER_MS
    }
}

/// Convert a non-negative microsecond value to a `Duration`
///
/// Negative values (including `TIME_UNSET`) clamp to zero.
pub fn us_to_duration(us: i64) -> Duration {
    Duration::from_micros(us.max(0) as u64)
}

/// Format a microsecond timestamp for log output, e.g. `12.345s`
pub fn format_us(us: i64) -> String {
    if us == TIME_UNSET {
        return "unset".to_string();
    }
    let sign = if us < 0 { "-" } else { "" };
    let abs = us.unsigned_abs();
    format!("{}{}.{:03}s", sign, abs / 1_000_000, (abs % 1_000_000) / 1_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_to_ms_truncates() {
        assert_eq!(us_to_ms(1_999), 1);
        assert_eq!(us_to_ms(2_000), 2);
        assert_eq!(us_to_ms(0), 0);
    }

    #[test]
    fn test_ms_to_us() {
        assert_eq!(ms_to_us(5), 5_000);
        assert_eq!(ms_to_us(0), 0);
    }

    #[test]
    fn test_unset_is_preserved_by_conversions() {
        assert_eq!(us_to_ms(TIME_UNSET), TIME_UNSET);
        assert_eq!(ms_to_us(TIME_UNSET), TIME_UNSET);
    }

    #[test]
    fn test_us_to_duration_clamps_negative() {
        assert_eq!(us_to_duration(-5), Duration::ZERO);
        assert_eq!(us_to_duration(TIME_UNSET), Duration::ZERO);
        assert_eq!(us_to_duration(1_500_000), Duration::from_millis(1_500));
    }

    #[test]
    fn test_format_us() {
        assert_eq!(format_us(0), "0.000s");
        assert_eq!(format_us(12_345_678), "12.345s");
        assert_eq!(format_us(-1_500_000), "-1.500s");
        assert_eq!(format_us(TIME_UNSET), "unset");
    }
}
