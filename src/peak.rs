//! Peak-hour classification.
//!
//! Fares are time-of-day dependent: the morning (06:00-08:59) and evening
//! (17:00-19:59) commute windows charge the peak price, everything else the
//! off-peak price. Classification uses the hour component in the configured
//! reference timezone, so callers must convert before classifying.

use chrono::{DateTime, TimeZone, Timelike};

/// Peak windows as inclusive local-hour ranges
const MORNING_PEAK_HOURS: std::ops::RangeInclusive<u32> = 6..=8;
const EVENING_PEAK_HOURS: std::ops::RangeInclusive<u32> = 17..=19;

/// Whether the given local time falls in a peak window.
///
/// Pure function of the timestamp's hour component; evaluated per call.
pub fn is_peak_hour<Tz: TimeZone>(t: &DateTime<Tz>) -> bool {
    let hour = t.hour();
    MORNING_PEAK_HOURS.contains(&hour) || EVENING_PEAK_HOURS.contains(&hour)
}
