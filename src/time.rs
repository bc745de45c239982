use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
#[allow(unused_imports)]
use core_maths::CoreFloat;
use julian_day_converter::unix_millis_to_julian_day;

use crate::CalculationError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian century (T) of an instant, measured in Julian centuries since the
/// J2000.0 epoch.
pub(crate) fn julian_century(instant: DateTime<Utc>) -> f64 {
    let julian_day = unix_millis_to_julian_day(instant.timestamp_millis());
    (julian_day - 2_451_545.0) / 36_525.0
}

/// Midnight (00:00 UTC) starting the given date.
pub(crate) fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// First instant of the given civil date in `timezone`.
///
/// Zones that jump over midnight on a DST change have no 00:00 that day; the
/// first existing wall-clock hour after it is used instead.
///
/// # Errors
///
/// Returns [`CalculationError::TimeConversionError`] when no hour of the morning
/// can be represented in the zone.
pub(crate) fn local_midnight(date: NaiveDate, timezone: Tz) -> Result<DateTime<Tz>, CalculationError> {
    let midnight = date.and_time(NaiveTime::MIN);
    for hour in 0..4 {
        let candidate = midnight + TimeDelta::hours(hour);
        match timezone.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return Ok(dt),
            LocalResult::Ambiguous(earliest, _) => return Ok(earliest),
            LocalResult::None => continue,
        }
    }
    Err(CalculationError::TimeConversionError)
}

/// Rounds an instant to the nearest whole second.
pub(crate) fn round_to_second(instant: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = i64::from(instant.nanosecond());
    let truncated = instant - TimeDelta::nanoseconds(nanos);
    if nanos >= 500_000_000 {
        truncated + TimeDelta::seconds(1)
    } else {
        truncated
    }
}

/// Rounds a wall-clock time to whole minutes, 30 seconds and above rounding up.
pub(crate) fn round_to_minute(time: DateTime<Tz>) -> DateTime<Tz> {
    let seconds = i64::from(time.second());
    let truncated = time - TimeDelta::seconds(seconds) - TimeDelta::nanoseconds(i64::from(time.nanosecond()));
    if seconds >= 30 {
        truncated + TimeDelta::minutes(1)
    } else {
        truncated
    }
}

/// Signed number of seconds from `from` to `to`.
pub(crate) fn seconds_between<A: TimeZone, B: TimeZone>(from: &DateTime<A>, to: &DateTime<B>) -> f64 {
    (to.timestamp_millis() - from.timestamp_millis()) as f64 / 1000.0
}

/// Moves `time` by a (possibly fractional) number of seconds, landing on a whole second.
pub(crate) fn shift_seconds(time: DateTime<Tz>, seconds: f64) -> DateTime<Tz> {
    time + TimeDelta::seconds(seconds.round() as i64)
}

/// Converts a fraction of a day to seconds.
pub(crate) fn day_fraction_to_seconds(fraction: f64) -> f64 {
    fraction * SECONDS_PER_DAY
}

/// Length of the night in seconds given the daylight span between sunrise and sunset.
pub(crate) fn night_seconds(sunrise: &DateTime<Tz>, sunset: &DateTime<Tz>) -> f64 {
    SECONDS_PER_DAY - seconds_between(sunrise, sunset)
}

/// Moves `time` by whole calendar days, keeping its wall-clock time where the
/// zone allows it.
pub(crate) fn shift_days(time: DateTime<Tz>, days: i64) -> DateTime<Tz> {
    let shifted = if days >= 0 {
        time.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        time.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or_else(|| time + TimeDelta::days(days))
}
