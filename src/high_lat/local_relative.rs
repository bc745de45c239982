use alloc::vec::Vec;
use chrono::TimeDelta;

use super::{store_offsets, transit_offsets, TRANSITION_CAP};
use crate::interpolate::{fit_runs, group_circular_runs};
use crate::time::{day_fraction_to_seconds, night_seconds, seconds_between, shift_seconds};
use crate::types::{Marker, Schedule};

/// Averages learned from the normal days of a year.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct NightShares {
    /// Mean daylight span as a fraction of 24 hours
    pub day: f64,
    /// Mean Fajr-to-sunrise span as a fraction of the night
    pub fajr: Option<f64>,
    /// Mean sunset-to-Isha span as a fraction of the night
    pub isha: Option<f64>,
}

/// Learns the average shares from the normal days, or `None` when there are none.
pub(crate) fn learn(schedules: &[Schedule]) -> Option<NightShares> {
    let mut day_sum = 0.0;
    let mut day_count = 0usize;
    let mut fajr_sum = 0.0;
    let mut fajr_count = 0usize;
    let mut isha_sum = 0.0;
    let mut isha_count = 0usize;

    for s in schedules.iter().filter(|s| s.is_normal) {
        let (Some(sunrise), Some(maghrib)) = (s.sunrise, s.maghrib) else {
            continue;
        };
        let night = night_seconds(&sunrise, &maghrib);
        if night <= 0.0 {
            continue;
        }
        day_sum += 1.0 - night / day_fraction_to_seconds(1.0);
        day_count += 1;

        if let Some(fajr) = s.fajr {
            fajr_sum += seconds_between(&fajr, &sunrise) / night;
            fajr_count += 1;
        }
        if let Some(isha) = s.isha {
            isha_sum += seconds_between(&maghrib, &isha) / night;
            isha_count += 1;
        }
    }

    if day_count == 0 {
        return None;
    }
    let mean = |sum: f64, count: usize| (count > 0).then(|| sum / count as f64);
    Some(NightShares {
        day: day_sum / day_count as f64,
        fajr: mean(fajr_sum, fajr_count),
        isha: mean(isha_sum, isha_count),
    })
}

/// Rebuilds missing Sunrise and Maghrib from the average day length, then missing
/// Fajr and Isha from the average share of the night they take on normal days.
///
/// Each rebuilt run is fitted between the times the sky gives on either side of
/// it, moving at most [`TRANSITION_CAP`] per day; times the sky gives are kept.
pub(crate) fn apply(mut schedules: Vec<Schedule>) -> Vec<Schedule> {
    let Some(shares) = learn(&schedules) else {
        log::warn!("no normal day to learn night shares from, leaving missing times empty");
        return schedules;
    };
    log::debug!("learned night shares {:?}", shares);

    let day_length = day_fraction_to_seconds(shares.day);
    let sunrise_missing = missing(&schedules, Marker::Sunrise);
    let maghrib_missing = missing(&schedules, Marker::Maghrib);
    for s in &mut schedules {
        match (s.sunrise, s.maghrib, s.zuhr) {
            (Some(sunrise), None, _) => s.maghrib = Some(shift_seconds(sunrise, day_length)),
            (None, Some(maghrib), _) => s.sunrise = Some(shift_seconds(maghrib, -day_length)),
            (None, None, Some(zuhr)) => {
                s.sunrise = Some(shift_seconds(zuhr, -day_length / 2.0));
                s.maghrib = Some(shift_seconds(zuhr, day_length / 2.0));
            }
            _ => {}
        }
    }
    fit_marker(&mut schedules, Marker::Sunrise, &sunrise_missing);
    fit_marker(&mut schedules, Marker::Maghrib, &maghrib_missing);

    let fajr_missing = missing(&schedules, Marker::Fajr);
    let isha_missing = missing(&schedules, Marker::Isha);
    for s in &mut schedules {
        let (Some(sunrise), Some(maghrib)) = (s.sunrise, s.maghrib) else {
            continue;
        };
        let night = night_seconds(&sunrise, &maghrib);
        if night <= 0.0 {
            continue;
        }
        if let (None, Some(share)) = (s.fajr, shares.fajr) {
            s.fajr = Some(sunrise - TimeDelta::seconds((night * share) as i64));
        }
        if let (None, Some(share)) = (s.isha, shares.isha) {
            s.isha = Some(maghrib + TimeDelta::seconds((night * share) as i64));
        }
    }
    fit_marker(&mut schedules, Marker::Fajr, &fajr_missing);
    fit_marker(&mut schedules, Marker::Isha, &isha_missing);

    schedules
}

fn missing(schedules: &[Schedule], marker: Marker) -> Vec<bool> {
    schedules.iter().map(|s| s.get(marker).is_none()).collect()
}

fn fit_marker(schedules: &mut [Schedule], marker: Marker, rebuilt: &[bool]) {
    let runs = group_circular_runs(rebuilt);
    if runs.is_empty() {
        return;
    }
    let mut offsets = transit_offsets(schedules, marker);
    fit_runs(&mut offsets, &runs, TRANSITION_CAP);
    store_offsets(schedules, marker, &offsets);
}
