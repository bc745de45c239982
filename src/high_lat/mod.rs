//! Reconstruction of markers that the sky does not provide.
//!
//! Above roughly 48° of latitude the sun stops reaching the usual twilight
//! depressions around the summer solstice, and beyond the polar circles it stops
//! rising or setting altogether. Each [`HighLatitudePolicy`] is a convention for
//! filling those gaps.
//!
//! Three families exist:
//!
//! - **portion of the night** ([`HighLatitudePolicy::AngleBased`],
//!   [`HighLatitudePolicy::OneSeventhNight`], [`HighLatitudePolicy::MiddleNight`]):
//!   Fajr and Isha are placed at a fixed share of the night between sunset and
//!   sunrise. Each day stands alone, and days without sunrise or sunset are left
//!   as they are.
//! - **borrowed shape** ([`HighLatitudePolicy::Mecca`], [`HighLatitudePolicy::AlwaysMecca`],
//!   [`HighLatitudePolicy::NearestLatitude`], [`HighLatitudePolicy::NearestLatitudeAsIs`],
//!   [`HighLatitudePolicy::ShariNormalDay`]): a second year is computed for a
//!   reference place and the time from transit to each of its markers is applied to
//!   the local transit.
//! - **local estimates** ([`HighLatitudePolicy::NearestDay`],
//!   [`HighLatitudePolicy::LocalRelativeEstimation`]): the gaps are filled from the
//!   location's own normal days.
//!
//! All policies except the portion-of-the-night family finish with a pass that
//! interpolates whatever marker is still missing from its neighbours. Every
//! policy ends by dropping any marker left out of the daily order.

pub(crate) mod local_relative;
pub(crate) mod nearest_day;
pub(crate) mod portion;
pub(crate) mod reference;

use alloc::vec::Vec;

use crate::config::{Config, HighLatitudePolicy};
use crate::interpolate::{fill_missing, group_circular_runs, smooth_transitions};
use crate::schedule::enforce_order;
use crate::solar::SolarEventProvider;
use crate::time::{seconds_between, shift_seconds};
use crate::types::{Marker, Schedule};
use crate::CalculationError;

use portion::NightPortion;

/// Largest day-to-day change, in seconds, allowed inside transitions around
/// periods filled from Mecca.
pub const MECCA_TRANSITION_CAP: f64 = 180.0;

/// Largest day-to-day change, in seconds, allowed inside every other transition.
pub const TRANSITION_CAP: f64 = 300.0;

/// Latitude the reference-location policies fall back to.
pub const NEAREST_NORMAL_LATITUDE: f64 = 45.0;

/// Fills the markers missing from `schedules` according to `config`'s policy.
///
/// # Arguments
///
/// * `provider` - Source of solar events for the reference schedules
/// * `config` - Location, conventions and the policy to apply
/// * `year` - Year `schedules` was built for
/// * `schedules` - Output of [`crate::schedule::build_year`] for `config` and `year`
///
/// # Errors
///
/// Propagates the errors of the reference schedules' solar events.
pub fn apply<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
    schedules: Vec<Schedule>,
) -> Result<Vec<Schedule>, CalculationError> {
    let policy = config.high_latitude_policy;
    log::debug!("applying high latitude policy {:?} for {}", policy, year);

    let corrected = match policy {
        HighLatitudePolicy::Disabled => return Ok(schedules),
        HighLatitudePolicy::AngleBased => {
            let portion = NightPortion::Angle {
                fajr: config.twilight.fajr_angle,
                isha: config.twilight.isha_angle,
            };
            return Ok(settle_order(portion::apply(schedules, portion), false));
        }
        HighLatitudePolicy::OneSeventhNight => {
            return Ok(settle_order(portion::apply(schedules, NightPortion::Seventh), false))
        }
        HighLatitudePolicy::MiddleNight => return Ok(settle_order(portion::apply(schedules, NightPortion::Middle), false)),
        HighLatitudePolicy::Mecca => reference::mecca(provider, config, year, schedules)?,
        HighLatitudePolicy::AlwaysMecca => reference::always_mecca(provider, config, year, schedules)?,
        HighLatitudePolicy::NearestLatitude => reference::nearest_latitude(provider, config, year, schedules)?,
        HighLatitudePolicy::NearestLatitudeAsIs => reference::nearest_latitude_as_is(provider, config, year)?,
        HighLatitudePolicy::ShariNormalDay => reference::shari_normal_day(provider, config, year, schedules)?,
        HighLatitudePolicy::NearestDay => nearest_day::apply(schedules),
        HighLatitudePolicy::LocalRelativeEstimation => local_relative::apply(schedules),
    };
    Ok(settle_order(fill_remaining(corrected), true))
}

/// Drops the markers a correction left out of the daily order. With `refill`
/// they are interpolated again from their neighbours, and whatever is still out
/// of order after that stays absent.
pub(crate) fn settle_order(mut schedules: Vec<Schedule>, refill: bool) -> Vec<Schedule> {
    let disordered = schedules.iter().filter(|s| !s.is_ordered()).count();
    if disordered == 0 {
        return schedules;
    }
    log::warn!("{} corrected days out of order", disordered);

    schedules.iter_mut().for_each(enforce_order);
    if refill {
        schedules = fill_remaining(schedules);
        schedules.iter_mut().for_each(enforce_order);
    }
    schedules
}

/// Signed seconds from each day's transit to `marker`.
pub(crate) fn transit_offsets(schedules: &[Schedule], marker: Marker) -> Vec<Option<f64>> {
    schedules.iter().map(|s| transit_offset(s, marker)).collect()
}

pub(crate) fn transit_offset(schedule: &Schedule, marker: Marker) -> Option<f64> {
    let zuhr = schedule.zuhr?;
    let time = schedule.get(marker)?;
    Some(seconds_between(&zuhr, &time))
}

/// Writes `offsets` back as times relative to each day's transit.
pub(crate) fn store_offsets(schedules: &mut [Schedule], marker: Marker, offsets: &[Option<f64>]) {
    for (schedule, offset) in schedules.iter_mut().zip(offsets) {
        if let (Some(zuhr), Some(offset)) = (schedule.zuhr, offset) {
            *schedule.get_mut(marker) = Some(shift_seconds(zuhr, *offset));
        }
    }
}

/// Eases `marker` into and out of every run of days flagged in `touched`.
pub(crate) fn smooth_marker(schedules: &mut [Schedule], marker: Marker, touched: &[bool], cap: f64) {
    let runs = group_circular_runs(touched);
    if runs.is_empty() {
        return;
    }
    let mut offsets = transit_offsets(schedules, marker);
    smooth_transitions(&mut offsets, &runs, cap);
    store_offsets(schedules, marker, &offsets);
}

/// Interpolates every marker still missing, day by day, from the days around it.
pub(crate) fn fill_remaining(mut schedules: Vec<Schedule>) -> Vec<Schedule> {
    for marker in Marker::RELATIVE {
        let mut offsets = transit_offsets(&schedules, marker);
        let missing = schedules
            .iter()
            .zip(&offsets)
            .filter(|(s, o)| s.zuhr.is_some() && o.is_none())
            .count();
        if missing == 0 {
            continue;
        }
        log::debug!("interpolating {} missing {:?} times", missing, marker);
        fill_missing(&mut offsets);
        store_offsets(&mut schedules, marker, &offsets);
    }
    schedules
}
