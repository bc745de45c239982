//! Policies that borrow the shape of the day from another place.

use alloc::vec;
use alloc::vec::Vec;
use chrono::TimeDelta;
use chrono_tz::Tz;

use super::{smooth_marker, transit_offset, MECCA_TRANSITION_CAP, NEAREST_NORMAL_LATITUDE, TRANSITION_CAP};
use crate::abnormal::extract_abnormal_ranges;
use crate::config::Config;
use crate::schedule::build_year;
use crate::solar::SolarEventProvider;
use crate::time::shift_seconds;
use crate::types::{Marker, Schedule};
use crate::CalculationError;

pub const MECCA_LATITUDE: f64 = 21.425_506;
pub const MECCA_LONGITUDE: f64 = 39.825_458;
pub const MECCA_TIMEZONE: Tz = chrono_tz::Asia::Riyadh;

/// Shortest fasting span (Fajr to Maghrib) of a normal day: 10h17m.
pub const MIN_FASTING_SECONDS: i64 = 10 * 3600 + 17 * 60;
/// Longest fasting span (Fajr to Maghrib) of a normal day: 17h36m.
pub const MAX_FASTING_SECONDS: i64 = 17 * 3600 + 36 * 60;

fn reference_year<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
    latitude: f64,
    longitude: f64,
    timezone: Tz,
) -> Result<Vec<Schedule>, CalculationError> {
    let reference = config.reference(latitude, longitude, timezone);
    build_year(provider, &reference, year).map(|(schedules, _)| schedules)
}

fn mecca_year<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
) -> Result<Vec<Schedule>, CalculationError> {
    reference_year(provider, config, year, MECCA_LATITUDE, MECCA_LONGITUDE, MECCA_TIMEZONE)
}

fn nearest_latitude_year<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
) -> Result<Vec<Schedule>, CalculationError> {
    let latitude = config.latitude.clamp(-NEAREST_NORMAL_LATITUDE, NEAREST_NORMAL_LATITUDE);
    reference_year(provider, config, year, latitude, config.longitude, config.timezone)
}

/// Sets `marker` on every day flagged in `days` to the local transit plus the
/// reference's time from transit to the same marker.
///
/// Days whose reference lacks the marker keep their own value. Returns the days
/// that were changed.
pub(crate) fn borrow_marker(schedules: &mut [Schedule], reference: &[Schedule], days: &[bool], marker: Marker) -> Vec<bool> {
    let mut touched = vec![false; schedules.len()];
    for (idx, schedule) in schedules.iter_mut().enumerate() {
        if !days.get(idx).copied().unwrap_or(false) {
            continue;
        }
        let (Some(zuhr), Some(offset)) = (schedule.zuhr, reference.get(idx).and_then(|r| transit_offset(r, marker)))
        else {
            continue;
        };
        *schedule.get_mut(marker) = Some(shift_seconds(zuhr, offset));
        touched[idx] = true;
    }
    touched
}

fn borrow_all(schedules: &mut [Schedule], reference: &[Schedule], days: &[bool], cap: Option<f64>) {
    for marker in Marker::RELATIVE {
        let touched = borrow_marker(schedules, reference, days, marker);
        if let Some(cap) = cap {
            smooth_marker(schedules, marker, &touched, cap);
        }
    }
}

/// Days of the abnormal ranges take the shape of Mecca's day.
pub(crate) fn mecca<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
    mut schedules: Vec<Schedule>,
) -> Result<Vec<Schedule>, CalculationError> {
    let days = extract_abnormal_ranges(&schedules).mask(schedules.len());
    let reference = mecca_year(provider, config, year)?;
    borrow_all(&mut schedules, &reference, &days, Some(MECCA_TRANSITION_CAP));
    Ok(schedules)
}

/// Every day takes the shape of Mecca's day.
pub(crate) fn always_mecca<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
    mut schedules: Vec<Schedule>,
) -> Result<Vec<Schedule>, CalculationError> {
    let days = vec![true; schedules.len()];
    let reference = mecca_year(provider, config, year)?;
    borrow_all(&mut schedules, &reference, &days, None);
    Ok(schedules)
}

/// The schedule of the same longitude at 45°, unchanged.
pub(crate) fn nearest_latitude_as_is<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
) -> Result<Vec<Schedule>, CalculationError> {
    nearest_latitude_year(provider, config, year)
}

/// Days outside the fasting bounds take the shape of the day at 45°.
pub(crate) fn shari_normal_day<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
    mut schedules: Vec<Schedule>,
) -> Result<Vec<Schedule>, CalculationError> {
    let days: Vec<bool> = schedules.iter().map(|s| !is_fasting_normal(s)).collect();
    let reference = nearest_latitude_year(provider, config, year)?;
    borrow_all(&mut schedules, &reference, &days, Some(TRANSITION_CAP));
    Ok(schedules)
}

/// A normal day whose fasting span lies within the accepted bounds.
pub(crate) fn is_fasting_normal(schedule: &Schedule) -> bool {
    let (Some(fajr), Some(maghrib)) = (schedule.fajr, schedule.maghrib) else {
        return false;
    };
    let fasting = maghrib - fajr;
    schedule.is_normal
        && fasting >= TimeDelta::seconds(MIN_FASTING_SECONDS)
        && fasting <= TimeDelta::seconds(MAX_FASTING_SECONDS)
}

/// Days of the abnormal ranges take the shape of the day at 45° on the same
/// meridian.
pub(crate) fn nearest_latitude<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
    mut schedules: Vec<Schedule>,
) -> Result<Vec<Schedule>, CalculationError> {
    let days = extract_abnormal_ranges(&schedules).mask(schedules.len());
    let reference = nearest_latitude_year(provider, config, year)?;
    borrow_all(&mut schedules, &reference, &days, Some(TRANSITION_CAP));
    Ok(schedules)
}
