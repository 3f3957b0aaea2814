//! Time sources
//!
//! Wall time is Unix milliseconds. The local day is derived from an explicit
//! UTC offset so day rollover can be tested without touching the host clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Source of wall time plus the local timezone it should be read in
pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> i64;

    /// Offset of local time from UTC, in minutes
    fn utc_offset_minutes(&self) -> i32 {
        0
    }

    /// Index of the current local day; changes at local midnight
    fn today(&self) -> i64 {
        day_marker(self.now_ms(), self.utc_offset_minutes())
    }
}

/// Local day index for a Unix timestamp
pub fn day_marker(now_ms: i64, utc_offset_minutes: i32) -> i64 {
    let local_ms = now_ms + i64::from(utc_offset_minutes) * 60 * 1000;
    local_ms.div_euclid(MS_PER_DAY)
}

/// Host clock with a configured timezone offset
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub utc_offset_minutes: i32,
}

impl SystemClock {
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self { utc_offset_minutes }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }

    fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicI64>,
    utc_offset_minutes: i32,
}

impl ManualClock {
    pub fn new(now_ms: i64, utc_offset_minutes: i32) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(now_ms)),
            utc_offset_minutes,
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }
}

/// Format a Unix timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn format_iso8601(timestamp_ms: i64) -> String {
    let days = timestamp_ms.div_euclid(MS_PER_DAY);
    let ms_of_day = timestamp_ms.rem_euclid(MS_PER_DAY);

    let (year, month, day) = civil_from_days(days);
    let hours = ms_of_day / 3_600_000;
    let minutes = ms_of_day / 60_000 % 60;
    let seconds = ms_of_day / 1000 % 60;
    let millis = ms_of_day % 1000;

    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}.{millis:03}Z")
}

/// Proleptic Gregorian date for a count of days since 1970-01-01
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_leap(year: i64) -> bool {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    }

    fn days_in_month(year: i64, month: u32) -> u32 {
        match month {
            2 if is_leap(year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    fn next_date((year, month, day): (i64, u32, u32)) -> (i64, u32, u32) {
        if day < days_in_month(year, month) {
            (year, month, day + 1)
        } else if month < 12 {
            (year, month + 1, 1)
        } else {
            (year + 1, 1, 1)
        }
    }

    #[test]
    fn test_day_marker_rolls_at_utc_midnight() {
        let midnight = 20_000 * MS_PER_DAY;
        assert_eq!(day_marker(midnight - 1, 0), 19_999);
        assert_eq!(day_marker(midnight, 0), 20_000);
    }

    #[test]
    fn test_day_marker_uses_offset() {
        // 23:30 UTC is already tomorrow at UTC+1
        let late = 20_000 * MS_PER_DAY + 23 * 3_600_000 + 30 * 60_000;
        assert_eq!(day_marker(late, 0), 20_000);
        assert_eq!(day_marker(late, 60), 20_001);
        // 00:30 UTC is still yesterday at UTC-5
        let early = 20_000 * MS_PER_DAY + 30 * 60_000;
        assert_eq!(day_marker(early, -300), 19_999);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(1_000, 0);
        let other = clock.clone();
        clock.advance(MS_PER_DAY);
        assert_eq!(other.now_ms(), 1_000 + MS_PER_DAY);
        assert_eq!(other.today(), 1);
        other.set(0);
        assert_eq!(clock.today(), 0);
    }

    #[test]
    fn test_format_iso8601() {
        assert_eq!(format_iso8601(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_iso8601(951_782_400_000), "2000-02-29T00:00:00.000Z");
        assert_eq!(
            format_iso8601(1_700_000_000_123),
            "2023-11-14T22:13:20.123Z"
        );
    }

    #[test]
    fn test_century_leap_rules() {
        // 1900 and 2100 skip Feb 29, 2000 keeps it
        assert_eq!(civil_from_days(-25_509), (1900, 2, 28));
        assert_eq!(civil_from_days(-25_508), (1900, 3, 1));
        assert_eq!(civil_from_days(11_016), (2000, 2, 29));
        assert_eq!(civil_from_days(47_540), (2100, 2, 28));
        assert_eq!(civil_from_days(47_541), (2100, 3, 1));
    }

    proptest! {
        /// Consecutive day counts are consecutive calendar dates, 1422 to 2517
        #[test]
        fn prop_days_step_through_the_calendar(days in -200_000i64..200_000) {
            let today = civil_from_days(days);
            prop_assert_eq!(civil_from_days(days + 1), next_date(today));
            prop_assert!((1..=12).contains(&today.1));
            prop_assert!(today.2 >= 1 && today.2 <= days_in_month(today.0, today.1));
        }

        #[test]
        fn prop_iso_date_matches_day_count(days in -200_000i64..200_000, ms in 0i64..MS_PER_DAY) {
            let (year, month, day) = civil_from_days(days);
            let formatted = format_iso8601(days * MS_PER_DAY + ms);
            let expected_date = format!("{year:04}-{month:02}-{day:02}T");
            prop_assert!(formatted.starts_with(&expected_date));
        }
    }
}
