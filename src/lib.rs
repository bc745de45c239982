//! # Prayer Calculator
//!
//! Yearly Islamic prayer-time schedules from solar geometry, including the
//! latitudes where the sun does not reach the usual twilight depressions, or does
//! not rise or set at all, for part of the year.
//!
//! For every civil day of a year the library computes six markers: Fajr (dawn),
//! Sunrise, Zuhr (solar transit), Asr (afternoon shadow length), Maghrib (sunset)
//! and Isha (dusk). Markers that the sky does not provide on a given day are
//! reconstructed with one of the conventions of [`HighLatitudePolicy`].
//!
//! ## Basic Usage
//!
//! ```
//! use prayer_calculator::{calculate, AsrConvention, CalculationMethod, Config};
//!
//! // Jakarta, Muslim World League angles, Shafii Asr
//! let config = Config::new(-6.175, 106.825, chrono_tz::Asia::Jakarta)
//!     .with_method(CalculationMethod::MuslimWorldLeague)
//!     .with_asr(AsrConvention::Shafii);
//!
//! let year = calculate(&config, 2024).unwrap();
//! assert_eq!(year.len(), 366);
//!
//! let first = &year[0];
//! println!("{} Fajr {:?} Maghrib {:?}", first.date, first.fajr, first.maghrib);
//! assert!(first.is_complete());
//! ```
//!
//! ## Pipeline
//!
//! 1. [`schedule::build_year`] asks a [`SolarEventProvider`] for every day of the
//!    year (plus one day on each side), moves events to the civil day they belong
//!    to and drops markers that break the daily order.
//! 2. When the location is beyond 45° of latitude, or any day is missing a
//!    twilight marker, [`high_lat::apply`] fills the gaps using the configured
//!    policy.
//! 3. The fixed [`ScheduleCorrections`] are added and the times are rounded to
//!    the configured [`Precision`].
#![no_std]

extern crate alloc;

pub mod abnormal;
pub mod config;
pub mod conventions;
pub mod high_lat;
pub mod interpolate;
pub(crate) mod math;
pub mod schedule;
pub mod solar;
pub(crate) mod time;
pub mod types;


use alloc::vec::Vec;
#[allow(unused_imports)]
use core_maths::*;
use thiserror::Error;

pub use crate::abnormal::extract_abnormal_ranges;
pub use crate::config::{AsrConvention, Config, HighLatitudePolicy, Precision, ScheduleCorrections, TwilightConvention};
pub use crate::conventions::CalculationMethod;
pub use crate::solar::{Elevation, Location, SolarCalculator, SolarEventProvider, SunEventRequest, SunEvents};
pub use crate::types::{AbnormalRange, AbnormalRanges, Marker, Schedule, Season};

/// Latitude beyond which the high-latitude policy always runs.
pub const HIGH_LATITUDE_THRESHOLD: f64 = 45.0;

/// Computes the prayer schedule of every civil day of `year`.
///
/// Uses the built-in [`SolarCalculator`]. See [`calculate_with`] to supply another
/// source of solar events.
///
/// # Arguments
///
/// * `config` - Location, conventions and output options
/// * `year` - Calendar year in `config.timezone`
///
/// # Returns
///
/// One [`Schedule`] per day, 365 or 366 in total, in date order.
///
/// # Errors
///
/// Returns a [`CalculationError`] if the configuration or the year is invalid.
pub fn calculate(config: &Config, year: i32) -> Result<Vec<Schedule>, CalculationError> {
    calculate_with(&SolarCalculator, config, year)
}

/// Computes the prayer schedule of every civil day of `year` from the solar
/// events of `provider`.
///
/// # Errors
///
/// Returns a [`CalculationError`] if the configuration or the year is invalid, or
/// if `provider` fails for any day.
pub fn calculate_with<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
) -> Result<Vec<Schedule>, CalculationError> {
    config.validate()?;
    schedule::year_bounds(year)?;

    let (mut schedules, abnormal_day_count) = schedule::build_year(provider, config, year)?;

    let needs_correction = config.latitude.abs() > HIGH_LATITUDE_THRESHOLD || abnormal_day_count > 0;
    if needs_correction && config.high_latitude_policy != HighLatitudePolicy::Disabled {
        schedules = high_lat::apply(provider, config, year, schedules)?;
    }

    apply_corrections(&mut schedules, &config.corrections);
    if config.precision == Precision::Minutes {
        round_to_minutes(&mut schedules);
    }
    Ok(schedules)
}

/// Adds the fixed per-marker offsets to every present marker.
fn apply_corrections(schedules: &mut [Schedule], corrections: &ScheduleCorrections) {
    if corrections.is_zero() {
        return;
    }
    for schedule in schedules {
        for marker in Marker::ALL {
            let offset = corrections.get(marker);
            if let Some(t) = schedule.get_mut(marker) {
                *t += offset;
            }
        }
    }
}

fn round_to_minutes(schedules: &mut [Schedule]) {
    for schedule in schedules {
        for marker in Marker::ALL {
            if let Some(t) = schedule.get_mut(marker) {
                *t = time::round_to_minute(*t);
            }
        }
    }
}

/// Errors that can occur while computing a year of schedules.
///
/// Configuration is validated before any day is computed. A prayer time that
/// does not occur on a given day is not an error; it is reported as `None` in
/// the [`Schedule`].
///
/// # Variants
///
/// - `LatitudeOutOfRange`: Latitude must be in range [-90°, 90°]
/// - `LongitudeOutOfRange`: Longitude must be in range [-180°, 180°]
/// - `ElevationOutOfRange`: Elevation must be within one Earth radius of sea level
/// - `TwilightAngleOutOfRange`: Fajr and Isha angles must be in range [0°, 90°)
/// - `MaghribDurationOutOfRange`: A fixed Isha delay must be positive and shorter than 12 hours
/// - `YearOutOfRange`: The year (and its neighbours) must be representable
/// - `TimeConversionError`: Invalid datetime or time zone conversion
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationError {
    /// Latitude out of valid range [-90, 90] degrees
    #[error("Latitude out of range")]
    LatitudeOutOfRange,

    /// Longitude out of valid range [-180, 180] degrees
    #[error("Longitude out of range")]
    LongitudeOutOfRange,

    /// Elevation further than Earth's radius from sea level
    #[error("Elevation out of range")]
    ElevationOutOfRange,

    /// Twilight angle out of valid range [0, 90) degrees
    #[error("Twilight angle out of range")]
    TwilightAngleOutOfRange,

    /// Fixed Maghrib to Isha delay not in (0, 12h)
    #[error("Maghrib duration out of range")]
    MaghribDurationOutOfRange,

    /// Year outside the supported calendar
    #[error("Year out of range")]
    YearOutOfRange,

    /// Error converting between time representations
    #[error("Time conversion error")]
    TimeConversionError,
}
