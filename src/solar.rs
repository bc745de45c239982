//! Per-day solar events.
//!
//! The schedule builder only ever talks to the sun through [`SolarEventProvider`].
//! [`SolarCalculator`] is the provider used by [`crate::calculate`]: a low-precision
//! solar model (declination and equation of time from the Julian century, good to a
//! fraction of a minute for prayer times) combined with the hour-angle equation.

use alloc::vec::Vec;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
#[allow(unused_imports)]
use core_maths::CoreFloat;

use crate::config::{Config, EARTH_R};
use crate::math::{acos_deg, cos_deg, normalize_degrees_360, shadow_altitude, sin_deg, tan_deg};
use crate::time::{julian_century, local_midnight, round_to_second, utc_midnight};
use crate::CalculationError;

/// Altitude of the sun's centre at sunrise and sunset for a sea-level observer:
/// solar semi-diameter plus standard refraction.
const SUNRISE_ALTITUDE: f64 = -0.833_3;

/// Fixed-point iterations allowed when solving for transit or an elevation crossing.
const MAX_ITERATIONS: usize = 5;

/// Where the sun is observed from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Location {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
    /// Height above sea level in meters
    pub elevation: f64,
}

impl From<&Config> for Location {
    fn from(config: &Config) -> Self {
        Self {
            latitude: config.latitude,
            longitude: config.longitude,
            elevation: config.elevation,
        }
    }
}

/// Target solar altitude of a requested event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Elevation {
    /// Fixed altitude in degrees; negative values are below the horizon
    Fixed(f64),
    /// Altitude at which a shadow is `factor` object heights longer than at transit
    Shadow(f64),
}

/// One elevation crossing to look for on a given day.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SunEventRequest {
    /// Search the morning side of transit (`true`) or the evening side (`false`)
    pub before_transit: bool,
    pub elevation: Elevation,
}

impl SunEventRequest {
    pub const fn morning(elevation: Elevation) -> Self {
        Self {
            before_transit: true,
            elevation,
        }
    }

    pub const fn evening(elevation: Elevation) -> Self {
        Self {
            before_transit: false,
            elevation,
        }
    }
}

/// Solar events of one civil day.
///
/// Every time lies inside the requested civil day. An event whose crossing falls
/// outside the day is moved by a whole day into it, so it can end up on the
/// "wrong" side of transit; the caller decides which day it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SunEvents {
    pub transit: DateTime<Utc>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    /// `custom[i]` answers `requests[i]`; `None` when the altitude is never reached
    pub custom: Vec<Option<DateTime<Utc>>>,
}

/// Source of per-day solar geometry.
pub trait SolarEventProvider {
    /// Computes transit, sunrise, sunset and the requested crossings for `date`.
    ///
    /// # Arguments
    ///
    /// * `date` - Civil date in `timezone`
    /// * `timezone` - Zone that defines the bounds of the civil day
    /// * `location` - Observer
    /// * `requests` - Additional elevation crossings to compute
    ///
    /// # Errors
    ///
    /// Implementations return a [`CalculationError`] when the day cannot be
    /// computed at all. An unreachable elevation is not an error.
    fn sun_events(
        &self,
        date: NaiveDate,
        timezone: Tz,
        location: &Location,
        requests: &[SunEventRequest],
    ) -> Result<SunEvents, CalculationError>;
}

impl<P: SolarEventProvider + ?Sized> SolarEventProvider for &P {
    fn sun_events(
        &self,
        date: NaiveDate,
        timezone: Tz,
        location: &Location,
        requests: &[SunEventRequest],
    ) -> Result<SunEvents, CalculationError> {
        (**self).sun_events(date, timezone, location, requests)
    }
}

/// Default [`SolarEventProvider`].
#[derive(Copy, Clone, Debug, Default)]
pub struct SolarCalculator;

impl SolarEventProvider for SolarCalculator {
    fn sun_events(
        &self,
        date: NaiveDate,
        timezone: Tz,
        location: &Location,
        requests: &[SunEventRequest],
    ) -> Result<SunEvents, CalculationError> {
        let day_start = local_midnight(date, timezone)?.with_timezone(&Utc);
        let next_date = date.succ_opt().ok_or(CalculationError::TimeConversionError)?;
        let day_end = local_midnight(next_date, timezone)?.with_timezone(&Utc);
        let fold = |instant: DateTime<Utc>| fold_into_day(instant, day_start, day_end);

        // zones far from their meridian put the UTC date of transit a day off
        let transit = fold(solar_transit(date, location.longitude));
        let anchor = transit.date_naive();
        let horizon = Elevation::Fixed(SUNRISE_ALTITUDE - compute_dip(location.elevation));
        let sunrise = crossing(anchor, location, SunEventRequest::morning(horizon)).map(fold);
        let sunset = crossing(anchor, location, SunEventRequest::evening(horizon)).map(fold);
        let custom = requests
            .iter()
            .map(|&request| crossing(anchor, location, request).map(fold))
            .collect();

        Ok(SunEvents {
            transit,
            sunrise,
            sunset,
            custom,
        })
    }
}

/// Geometric dip of the horizon, in degrees, for an observer `elevation` meters
/// above sea level.
fn compute_dip(elevation: f64) -> f64 {
    if elevation > 0.0 {
        (EARTH_R / (EARTH_R + elevation)).acos().to_degrees()
    } else {
        0.0
    }
}

/// Moves `instant` by whole days into `[day_start, day_end)`, rounded to the second.
fn fold_into_day(mut instant: DateTime<Utc>, day_start: DateTime<Utc>, day_end: DateTime<Utc>) -> DateTime<Utc> {
    while instant < day_start {
        instant += TimeDelta::days(1);
    }
    while instant >= day_end {
        instant -= TimeDelta::days(1);
    }
    round_to_second(instant)
}

/// Declination (degrees) and equation of time (minutes) of the sun.
#[derive(Copy, Clone, Debug)]
struct SunCoordinates {
    declination: f64,
    equation_of_time: f64,
}

impl SunCoordinates {
    fn at(instant: DateTime<Utc>) -> Self {
        let t = julian_century(instant);

        let mean_longitude = normalize_degrees_360(280.466_46 + t * (36_000.769_83 + t * 0.000_303_2));
        let mean_anomaly = normalize_degrees_360(357.529_11 + t * (35_999.050_29 - t * 0.000_153_7));
        let eccentricity = 0.016_708_634 - t * (0.000_042_037 + t * 0.000_000_126_7);
        let center = sin_deg(mean_anomaly) * (1.914_602 - t * (0.004_817 + t * 0.000_014))
            + sin_deg(2.0 * mean_anomaly) * (0.019_993 - t * 0.000_101)
            + sin_deg(3.0 * mean_anomaly) * 0.000_289;

        let omega = 125.04 - 1_934.136 * t;
        let apparent_longitude = mean_longitude + center - 0.005_69 - 0.004_78 * sin_deg(omega);
        let mean_obliquity = 23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.000_59 - t * 0.001_813))) / 60.0) / 60.0;
        let obliquity = mean_obliquity + 0.002_56 * cos_deg(omega);

        let declination = (sin_deg(obliquity) * sin_deg(apparent_longitude)).asin().to_degrees();

        let y = tan_deg(obliquity / 2.0).powi(2);
        let equation = y * sin_deg(2.0 * mean_longitude) - 2.0 * eccentricity * sin_deg(mean_anomaly)
            + 4.0 * eccentricity * y * sin_deg(mean_anomaly) * cos_deg(2.0 * mean_longitude)
            - 0.5 * y * y * sin_deg(4.0 * mean_longitude)
            - 1.25 * eccentricity * eccentricity * sin_deg(2.0 * mean_anomaly);

        Self {
            declination,
            equation_of_time: 4.0 * equation.to_degrees(),
        }
    }
}

/// UTC instant `minutes` after 00:00 UTC of `date`.
fn minutes_after_midnight(date: NaiveDate, minutes: f64) -> DateTime<Utc> {
    utc_midnight(date) + TimeDelta::milliseconds((minutes * 60_000.0).round() as i64)
}

/// Minutes after 00:00 UTC at which the sun crosses the meridian at `longitude`,
/// given the equation of time.
fn noon_minutes(longitude: f64, equation_of_time: f64) -> f64 {
    720.0 - 4.0 * longitude - equation_of_time
}

fn converged(previous: DateTime<Utc>, next: DateTime<Utc>) -> bool {
    (next - previous).num_milliseconds().abs() < 1_000
}

/// Solar transit on `date`, found by iterating on the equation of time.
fn solar_transit(date: NaiveDate, longitude: f64) -> DateTime<Utc> {
    let mut transit = minutes_after_midnight(date, noon_minutes(longitude, 0.0));
    for _ in 0..MAX_ITERATIONS {
        let sun = SunCoordinates::at(transit);
        let next = minutes_after_midnight(date, noon_minutes(longitude, sun.equation_of_time));
        let done = converged(transit, next);
        transit = next;
        if done {
            break;
        }
    }
    transit
}

/// Instant the sun crosses the requested elevation on `date`, or `None` when it
/// never does.
fn crossing(date: NaiveDate, location: &Location, request: SunEventRequest) -> Option<DateTime<Utc>> {
    let mut estimate = solar_transit(date, location.longitude);
    for _ in 0..MAX_ITERATIONS {
        let sun = SunCoordinates::at(estimate);
        let altitude = match request.elevation {
            Elevation::Fixed(altitude) => altitude,
            Elevation::Shadow(factor) => shadow_altitude(factor, sun.declination - location.latitude),
        };

        let cos_hour_angle = (sin_deg(altitude) - sin_deg(location.latitude) * sin_deg(sun.declination))
            / (cos_deg(location.latitude) * cos_deg(sun.declination));
        let hour_angle = acos_deg(cos_hour_angle)?;

        let noon = noon_minutes(location.longitude, sun.equation_of_time);
        let minutes = if request.before_transit {
            noon - 4.0 * hour_angle
        } else {
            noon + 4.0 * hour_angle
        };

        let next = minutes_after_midnight(date, minutes);
        let done = converged(estimate, next);
        estimate = next;
        if done {
            break;
        }
    }
    Some(estimate)
}
