extern crate std;
use chrono::{TimeDelta, Timelike};

use super::{date, day_index, mock_config, standard_event, utc_hms, Event, MockProvider};
use crate::config::{AsrConvention, Config, HighLatitudePolicy, Precision, ScheduleCorrections, TwilightConvention};
use crate::conventions::CalculationMethod;
use crate::types::Marker;
use crate::{calculate, calculate_with, CalculationError};

#[test]
fn defaults() {
    let config = Config::new(51.5, -0.13, chrono_tz::Europe::London);
    assert_eq!(config.twilight, TwilightConvention::new(18.0, 18.0));
    assert_eq!(config.asr, AsrConvention::Shafii);
    assert_eq!(config.high_latitude_policy, HighLatitudePolicy::LocalRelativeEstimation);
    assert_eq!(config.precision, Precision::Minutes);
    assert!(config.corrections.is_zero());
    assert_eq!(config.elevation, 0.0);
    assert!(config.validate().is_ok());
}

#[test]
fn invalid_parameters_are_rejected() {
    let base = Config::new(0.0, 0.0, chrono_tz::UTC);
    let cases = [
        (Config { latitude: 90.5, ..base }, CalculationError::LatitudeOutOfRange),
        (Config { latitude: f64::NAN, ..base }, CalculationError::LatitudeOutOfRange),
        (Config { longitude: -181.0, ..base }, CalculationError::LongitudeOutOfRange),
        (base.with_elevation(7_000_000.0), CalculationError::ElevationOutOfRange),
        (base.with_twilight(TwilightConvention::new(90.0, 18.0)), CalculationError::TwilightAngleOutOfRange),
        (base.with_twilight(TwilightConvention::new(18.0, -1.0)), CalculationError::TwilightAngleOutOfRange),
        (
            base.with_twilight(TwilightConvention::new(18.0, 18.0).with_maghrib_duration(TimeDelta::zero())),
            CalculationError::MaghribDurationOutOfRange,
        ),
        (
            base.with_twilight(TwilightConvention::new(18.0, 18.0).with_maghrib_duration(TimeDelta::hours(12))),
            CalculationError::MaghribDurationOutOfRange,
        ),
    ];
    for (config, expected) in cases {
        assert_eq!(config.validate(), Err(expected));
        assert_eq!(calculate(&config, 2023).unwrap_err(), expected);
    }
}

#[test]
fn boundary_values_are_accepted() {
    let base = Config::new(90.0, -180.0, chrono_tz::UTC);
    assert!(base.validate().is_ok());
    assert!(base.with_twilight(TwilightConvention::new(0.0, 0.0)).validate().is_ok());
    assert!(base.with_elevation(-400.0).validate().is_ok());
}

#[test]
fn validation_happens_before_any_solar_computation() {
    let provider = super::FailingProvider {
        fails_on: date(2023, 1, 1),
    };
    let config = mock_config(95.0);
    assert_eq!(
        calculate_with(&provider, &config, 2023).unwrap_err(),
        CalculationError::LatitudeOutOfRange
    );
}

#[test]
fn unrepresentable_year_is_rejected() {
    let config = Config::new(21.4, 39.8, chrono_tz::Asia::Riyadh);
    assert_eq!(calculate(&config, 300_000).unwrap_err(), CalculationError::YearOutOfRange);
}

#[test]
fn method_presets() {
    assert_eq!(
        CalculationMethod::MuslimWorldLeague.twilight(),
        TwilightConvention::new(18.0, 17.0)
    );
    assert_eq!(CalculationMethod::Isna.twilight(), TwilightConvention::new(15.0, 15.0));
    assert_eq!(CalculationMethod::Egypt.twilight(), TwilightConvention::new(19.5, 17.5));
    assert_eq!(CalculationMethod::Tehran.twilight(), TwilightConvention::new(17.7, 14.0));

    let umm_al_qura = CalculationMethod::UmmAlQura.twilight();
    assert_eq!(umm_al_qura.fajr_angle, 18.5);
    assert_eq!(umm_al_qura.maghrib_duration, Some(TimeDelta::minutes(90)));

    for method in CalculationMethod::ALL {
        let config = Config::new(0.0, 0.0, chrono_tz::UTC).with_method(method);
        assert!(config.validate().is_ok(), "{:?}", method);
        assert_eq!(TwilightConvention::from(method), method.twilight());
    }
}

#[test]
fn asr_shadow_factors() {
    assert_eq!(AsrConvention::Shafii.shadow_factor(), 1.0);
    assert_eq!(AsrConvention::Hanafi.shadow_factor(), 2.0);
}

#[test]
fn corrections_are_added_before_rounding() {
    let provider = MockProvider::new(|d, _, e| match e {
        Event::Fajr => Some(utc_hms(d, 4, 30, 40)),
        Event::Isha => Some(utc_hms(d, 19, 30, 29)),
        _ => standard_event(d, e),
    });
    let corrections = ScheduleCorrections {
        fajr: TimeDelta::minutes(2),
        zuhr: TimeDelta::minutes(-1),
        ..ScheduleCorrections::default()
    };
    let config = mock_config(10.0)
        .with_corrections(corrections)
        .with_precision(Precision::Minutes);
    let year = calculate_with(&provider, &config, 2023).unwrap();

    let s = &year[day_index(date(2023, 4, 1))];
    assert_eq!(s.fajr.unwrap(), utc_hms(date(2023, 4, 1), 4, 33, 0));
    assert_eq!(s.isha.unwrap(), utc_hms(date(2023, 4, 1), 19, 30, 0));
    assert_eq!(s.zuhr.unwrap(), utc_hms(date(2023, 4, 1), 11, 59, 0));
    for marker in Marker::ALL {
        let t = s.get(marker).unwrap();
        assert_eq!(t.second(), 0);
        assert_eq!(t.nanosecond(), 0);
    }
}

#[test]
fn second_precision_keeps_seconds() {
    let provider = MockProvider::new(|d, _, e| match e {
        Event::Fajr => Some(utc_hms(d, 4, 30, 40)),
        _ => standard_event(d, e),
    });
    let year = calculate_with(&provider, &mock_config(10.0), 2023).unwrap();
    assert_eq!(year[0].fajr.unwrap(), utc_hms(date(2023, 1, 1), 4, 30, 40));
}
