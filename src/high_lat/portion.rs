use alloc::vec::Vec;
use chrono::TimeDelta;
#[allow(unused_imports)]
use core_maths::CoreFloat;

use crate::schedule::ASTRONOMICAL_TWILIGHT;
use crate::time::night_seconds;
use crate::types::Schedule;

/// Share of the night given to Fajr (before sunrise) and Isha (after sunset).
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum NightPortion {
    /// `angle / 60` of the night, using the convention's twilight angles
    Angle { fajr: f64, isha: f64 },
    Seventh,
    Middle,
}

impl NightPortion {
    fn fractions(self) -> (f64, f64) {
        let share = |angle: f64| {
            let angle = if angle == 0.0 { ASTRONOMICAL_TWILIGHT } else { angle };
            angle / 60.0
        };
        match self {
            NightPortion::Angle { fajr, isha } => (share(fajr), share(isha)),
            NightPortion::Seventh => (1.0 / 7.0, 1.0 / 7.0),
            NightPortion::Middle => (0.5, 0.5),
        }
    }

    fn seconds(self, night: f64, fraction: f64) -> i64 {
        match self {
            NightPortion::Middle => (night * fraction).floor() as i64,
            _ => (night * fraction).round() as i64,
        }
    }
}

/// Places Fajr and Isha at a share of the night on every day that has a sunrise
/// and a sunset but lacks Fajr or Isha.
pub(crate) fn apply(mut schedules: Vec<Schedule>, portion: NightPortion) -> Vec<Schedule> {
    let (fajr_fraction, isha_fraction) = portion.fractions();
    for s in &mut schedules {
        let (Some(sunrise), Some(maghrib)) = (s.sunrise, s.maghrib) else {
            continue;
        };
        if s.fajr.is_some() && s.isha.is_some() {
            continue;
        }

        let night = night_seconds(&sunrise, &maghrib);
        s.fajr = Some(sunrise - TimeDelta::seconds(portion.seconds(night, fajr_fraction)));
        s.isha = Some(maghrib + TimeDelta::seconds(portion.seconds(night, isha_fraction)));
    }
    schedules
}
