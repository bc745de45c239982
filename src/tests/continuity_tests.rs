//! Continuity tests for yearly schedules.
//!
//! Prayer times drift slowly from one day to the next. These tests verify that
//! computed years show no sudden jumps between consecutive
//! days once each marker is measured from its day's transit.

extern crate std;
use chrono::TimeDelta;
use proptest::prelude::*;
use std::format;

use crate::config::{Config, Precision};
use crate::conventions::CalculationMethod;
use crate::high_lat::transit_offset;
use crate::types::Marker;
use crate::calculate;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn mid_latitude_schedules_change_smoothly_over_consecutive_days(
        latitude in -45.0_f64..=45.0,
        longitude in -180.0_f64..=180.0,
        year in 1990i32..=2060,
    ) {
        let hours = (longitude / 15.0).round() as i32;
        let timezone = format!("Etc/GMT{:+}", -hours).parse().unwrap();
        let config = Config::new(latitude, longitude, timezone)
            .with_method(CalculationMethod::MuslimWorldLeague)
            .with_precision(Precision::Seconds);
        let schedules = calculate(&config, year).unwrap();

        // transit moves by well under a minute per day
        let max_transit_jump = 60.0;
        // at 45° twilight moves by a few minutes per day at most
        let max_jump_seconds = 10.0 * 60.0;

        for pair in schedules.windows(2) {
            let (today, tomorrow) = (&pair[0], &pair[1]);
            let transit_drift = (tomorrow.zuhr.unwrap() - today.zuhr.unwrap() - TimeDelta::days(1)).num_seconds().abs();
            prop_assert!((transit_drift as f64) < max_transit_jump,
                "Transit drifted {} seconds between {} and {}", transit_drift, today.date, tomorrow.date);

            for marker in Marker::RELATIVE {
                let a = transit_offset(today, marker).unwrap();
                let b = transit_offset(tomorrow, marker).unwrap();
                prop_assert!((a - b).abs() < max_jump_seconds,
                    "{:?} jumped {} seconds between {} and {}", marker, (a - b).abs(), today.date, tomorrow.date);
            }
        }
    }
}
