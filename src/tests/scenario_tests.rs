//! Whole years computed with the built-in solar model.

extern crate std;
use chrono::{Datelike, Timelike};
use chrono_tz::Tz;
use proptest::prelude::*;
use std::format;

use super::{date, day_index};
use crate::abnormal::extract_abnormal_ranges;
use crate::config::{AsrConvention, Config, HighLatitudePolicy, Precision};
use crate::conventions::CalculationMethod;
use crate::high_lat::{transit_offset, MECCA_TRANSITION_CAP, TRANSITION_CAP};
use crate::schedule::build_year;
use crate::time::night_seconds;
use crate::types::{Marker, Schedule};
use crate::{calculate, SolarCalculator};

/// Slack for times stored to the whole second on both days of a pair.
const ROUNDING_SECONDS: f64 = 2.0;

fn jakarta() -> Config {
    Config::new(-6.175, 106.825, chrono_tz::Asia::Jakarta)
        .with_method(CalculationMethod::MuslimWorldLeague)
        .with_asr(AsrConvention::Shafii)
}

fn tromso() -> Config {
    Config::new(69.6492, 18.9553, chrono_tz::Europe::Oslo)
        .with_method(CalculationMethod::MuslimWorldLeague)
        .with_asr(AsrConvention::Shafii)
        .with_high_latitude_policy(HighLatitudePolicy::NearestLatitude)
        .with_precision(Precision::Seconds)
}

fn oslo(policy: HighLatitudePolicy) -> Config {
    Config::new(59.9139, 10.7522, chrono_tz::Europe::Oslo)
        .with_method(CalculationMethod::MuslimWorldLeague)
        .with_high_latitude_policy(policy)
        .with_precision(Precision::Seconds)
}

/// Fixed-offset zone `shift` hours away from the solar time of `longitude`.
fn solar_zone(longitude: f64, shift: i32) -> Tz {
    let hours = ((longitude / 15.0).round() as i32 + shift).clamp(-12, 14);
    // the Etc zones have inverted signs
    format!("Etc/GMT{:+}", -hours).parse().unwrap()
}

/// Largest day-to-day change of `marker`, relative to transit, over the pairs of
/// consecutive days where the correction moved at least one of the two.
fn largest_corrected_step(raw: &[Schedule], corrected: &[Schedule], marker: Marker) -> (f64, Option<Schedule>) {
    let mut largest = (0.0, None);
    for (r, c) in raw.windows(2).zip(corrected.windows(2)) {
        if r[0].get(marker) == c[0].get(marker) && r[1].get(marker) == c[1].get(marker) {
            continue;
        }
        let a = transit_offset(&c[0], marker).unwrap();
        let b = transit_offset(&c[1], marker).unwrap();
        if (a - b).abs() > largest.0 {
            largest = ((a - b).abs(), Some(c[1].clone()));
        }
    }
    largest
}

fn minutes_of_day(schedule: &Schedule, marker: Marker) -> u32 {
    let t = schedule.get(marker).unwrap();
    t.hour() * 60 + t.minute()
}

#[test]
fn jakarta_needs_no_correction() {
    let (raw, abnormal) = build_year(&SolarCalculator, &jakarta(), 2023).unwrap();
    assert_eq!(abnormal, 0);
    assert!(raw.iter().all(|s| s.is_normal));

    for year in [2023, 2024] {
        let schedules = calculate(&jakarta(), year).unwrap();
        assert_eq!(schedules.len(), if year == 2024 { 366 } else { 365 });
        for s in &schedules {
            assert!(s.is_complete(), "{:?}", s);
            assert!(s.is_ordered(), "{:?}", s);
            assert_eq!(s.date.year(), year);
        }
    }
}

#[test]
fn jakarta_new_year_times() {
    let first = &calculate(&jakarta(), 2023).unwrap()[0];
    assert_eq!(first.date, date(2023, 1, 1));

    let within = |marker: Marker, from: (u32, u32), to: (u32, u32)| {
        let minutes = minutes_of_day(first, marker);
        assert!(
            minutes >= from.0 * 60 + from.1 && minutes <= to.0 * 60 + to.1,
            "{:?} at {:?}",
            marker,
            first.get(marker)
        );
    };
    within(Marker::Fajr, (4, 10), (4, 40));
    within(Marker::Sunrise, (5, 30), (5, 55));
    within(Marker::Zuhr, (11, 50), (12, 2));
    within(Marker::Asr, (15, 5), (15, 40));
    within(Marker::Maghrib, (18, 0), (18, 25));
    within(Marker::Isha, (19, 10), (19, 40));
}

#[test]
fn tromso_is_complete_and_continuous_through_the_year() {
    let config = tromso();
    let (raw, abnormal) = build_year(&SolarCalculator, &config, 2023).unwrap();
    assert!(abnormal > 0);
    let ranges = extract_abnormal_ranges(&raw);
    assert!(!ranges.summer.is_empty());
    assert!(!ranges.winter.is_empty());
    assert!(ranges.summer.indexes.contains(&day_index(date(2023, 6, 21))));
    assert!(ranges.winter.indexes.contains(&day_index(date(2023, 12, 21))));

    let schedules = calculate(&config, 2023).unwrap();
    assert_eq!(schedules.len(), 365);
    for s in &schedules {
        assert!(s.is_complete(), "{:?}", s);
        assert!(s.is_ordered(), "{:?}", s);
    }

    for marker in [Marker::Fajr, Marker::Isha] {
        let (jump, day) = largest_corrected_step(&raw, &schedules, marker);
        assert!(jump <= TRANSITION_CAP + ROUNDING_SECONDS, "{:?} jumps {}s into {:?}", marker, jump, day);
    }
}

#[test]
fn every_policy_keeps_polar_days_in_order() {
    for policy in [
        HighLatitudePolicy::Disabled,
        HighLatitudePolicy::Mecca,
        HighLatitudePolicy::AlwaysMecca,
        HighLatitudePolicy::LocalRelativeEstimation,
        HighLatitudePolicy::NearestDay,
        HighLatitudePolicy::NearestLatitude,
        HighLatitudePolicy::NearestLatitudeAsIs,
        HighLatitudePolicy::ShariNormalDay,
        HighLatitudePolicy::AngleBased,
        HighLatitudePolicy::OneSeventhNight,
        HighLatitudePolicy::MiddleNight,
    ] {
        let schedules = calculate(&tromso().with_high_latitude_policy(policy), 2023).unwrap();
        assert_eq!(schedules.len(), 365);
        for s in &schedules {
            assert!(s.is_ordered(), "{:?}: {:?}", policy, s);
        }
    }
}

#[test]
fn mecca_transitions_stay_under_their_cap() {
    let config = oslo(HighLatitudePolicy::Mecca);
    let (raw, abnormal) = build_year(&SolarCalculator, &config, 2023).unwrap();
    assert!(abnormal > 0);

    let schedules = calculate(&config, 2023).unwrap();
    for s in &schedules {
        assert!(s.is_complete(), "{:?}", s);
        assert!(s.is_ordered(), "{:?}", s);
    }
    for marker in [Marker::Fajr, Marker::Isha] {
        let (jump, day) = largest_corrected_step(&raw, &schedules, marker);
        assert!(jump <= MECCA_TRANSITION_CAP + ROUNDING_SECONDS, "{:?} jumps {}s into {:?}", marker, jump, day);
    }
}

#[test]
fn estimated_twilight_moves_gradually_and_keeps_the_sky() {
    let config = oslo(HighLatitudePolicy::LocalRelativeEstimation);
    let (raw, abnormal) = build_year(&SolarCalculator, &config, 2023).unwrap();
    assert!(abnormal > 0);

    let schedules = calculate(&config, 2023).unwrap();
    for (before, after) in raw.iter().zip(&schedules) {
        assert!(after.is_complete(), "{:?}", after);
        assert!(after.is_ordered(), "{:?}", after);
        assert_eq!(before.sunrise, after.sunrise);
        assert_eq!(before.maghrib, after.maghrib);
        if before.fajr.is_some() {
            assert_eq!(before.fajr, after.fajr);
        }
    }
    for marker in [Marker::Fajr, Marker::Isha] {
        let (jump, day) = largest_corrected_step(&raw, &schedules, marker);
        assert!(jump <= TRANSITION_CAP + ROUNDING_SECONDS, "{:?} jumps {}s into {:?}", marker, jump, day);
    }
}

#[test]
fn zones_far_from_their_meridian_keep_every_day() {
    let places = [
        (-13.83, -171.76, chrono_tz::Pacific::Apia),
        (1.87, -157.47, chrono_tz::Pacific::Kiritimati),
    ];
    for (latitude, longitude, timezone) in places {
        let config = Config::new(latitude, longitude, timezone).with_method(CalculationMethod::MuslimWorldLeague);
        let (_, abnormal) = build_year(&SolarCalculator, &config, 2023).unwrap();
        assert_eq!(abnormal, 0, "{:?}", timezone);

        let schedules = calculate(&config, 2023).unwrap();
        assert_eq!(schedules.len(), 365);
        for s in &schedules {
            assert!(s.is_complete(), "{:?}", s);
            assert!(s.is_ordered(), "{:?}", s);
            assert_eq!(s.zuhr.unwrap().date_naive(), s.date);
        }
    }
}

#[test]
fn angle_based_keeps_the_share_of_the_night() {
    let config = Config::new(51.5, -0.13, chrono_tz::Europe::London)
        .with_method(CalculationMethod::MuslimWorldLeague)
        .with_high_latitude_policy(HighLatitudePolicy::AngleBased)
        .with_precision(Precision::Seconds);
    let (raw, _) = build_year(&SolarCalculator, &config, 2023).unwrap();
    let schedules = calculate(&config, 2023).unwrap();

    let mut corrected_days = 0;
    for (before, after) in raw.iter().zip(&schedules) {
        if before.fajr.is_some() {
            continue;
        }
        corrected_days += 1;
        let sunrise = after.sunrise.unwrap();
        let maghrib = after.maghrib.unwrap();
        let night = night_seconds(&sunrise, &maghrib);
        let fajr_share = (sunrise - after.fajr.unwrap()).num_seconds() as f64;
        let isha_share = (after.isha.unwrap() - maghrib).num_seconds() as f64;
        assert!((fajr_share - night * 18.0 / 60.0).abs() <= 1.0, "{:?}", after);
        assert!((isha_share - night * 17.0 / 60.0).abs() <= 1.0, "{:?}", after);
    }
    assert!(corrected_days > 0);
}

#[test]
fn southern_summer_is_reported_as_winter() {
    let config = Config::new(-54.8019, -68.303, chrono_tz::America::Argentina::Ushuaia);
    let (raw, abnormal) = build_year(&SolarCalculator, &config, 2023).unwrap();
    assert!(abnormal > 0);

    let ranges = extract_abnormal_ranges(&raw);
    assert!(ranges.winter.indexes.contains(&day_index(date(2023, 12, 21))));
    assert!(ranges.winter.indexes.contains(&0));

    let schedules = calculate(&config, 2023).unwrap();
    assert!(schedules.iter().all(Schedule::is_complete));
}

#[test]
fn calculation_is_deterministic() {
    let config = tromso().with_high_latitude_policy(HighLatitudePolicy::LocalRelativeEstimation);
    assert_eq!(calculate(&config, 2024).unwrap(), calculate(&config, 2024).unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn mid_latitudes_have_no_abnormal_days(
        latitude in -45.0_f64..=45.0,
        longitude in -180.0_f64..=180.0,
        hanafi in any::<bool>(),
        shift in -3i32..=3,
    ) {
        let asr = if hanafi { AsrConvention::Hanafi } else { AsrConvention::Shafii };
        let config = Config::new(latitude, longitude, solar_zone(longitude, shift))
            .with_method(CalculationMethod::MuslimWorldLeague)
            .with_asr(asr);

        let (_, abnormal) = build_year(&SolarCalculator, &config, 2023).unwrap();
        prop_assert_eq!(abnormal, 0);

        let schedules = calculate(&config, 2023).unwrap();
        for s in &schedules {
            prop_assert!(s.is_complete(), "{:?}", s);
            prop_assert!(s.is_ordered(), "{:?}", s);
        }
    }
}
