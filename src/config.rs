//! Calculation parameters.
//!
//! A [`Config`] is built once with [`Config::new`] and refined with the `with_*`
//! methods, each of which returns a new value:
//!
//! ```
//! use prayer_calculator::{AsrConvention, CalculationMethod, Config, HighLatitudePolicy};
//!
//! let config = Config::new(59.91, 10.75, chrono_tz::Europe::Oslo)
//!     .with_method(CalculationMethod::MuslimWorldLeague)
//!     .with_asr(AsrConvention::Hanafi)
//!     .with_high_latitude_policy(HighLatitudePolicy::NearestLatitude);
//! assert!(config.validate().is_ok());
//! ```

use chrono::TimeDelta;
use chrono_tz::Tz;

use crate::conventions::CalculationMethod;
use crate::types::Marker;
use crate::CalculationError;

/// Earth's equatorial radius in meters.
pub(crate) const EARTH_R: f64 = 6_378_136.6;

/// Sun depression angles defining Fajr and Isha, plus an optional fixed Isha delay.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TwilightConvention {
    /// Depression of the sun below the horizon at Fajr, in degrees
    pub fajr_angle: f64,
    /// Depression of the sun below the horizon at Isha, in degrees
    pub isha_angle: f64,
    /// When set, Isha is always this long after Maghrib and `isha_angle` is ignored
    pub maghrib_duration: Option<TimeDelta>,
}

impl TwilightConvention {
    pub const fn new(fajr_angle: f64, isha_angle: f64) -> Self {
        Self {
            fajr_angle,
            isha_angle,
            maghrib_duration: None,
        }
    }

    pub const fn with_maghrib_duration(self, duration: TimeDelta) -> Self {
        Self {
            maghrib_duration: Some(duration),
            ..self
        }
    }
}

impl Default for TwilightConvention {
    fn default() -> Self {
        CalculationMethod::AstronomicalTwilight.twilight()
    }
}

/// Shadow-length convention for Asr.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsrConvention {
    /// Shadow equals the object's height (plus its transit shadow)
    #[default]
    Shafii,
    /// Shadow equals twice the object's height (plus its transit shadow)
    Hanafi,
}

impl AsrConvention {
    pub const fn shadow_factor(self) -> f64 {
        match self {
            AsrConvention::Shafii => 1.0,
            AsrConvention::Hanafi => 2.0,
        }
    }
}

/// How missing markers are reconstructed at high latitudes.
///
/// See [`crate::high_lat`] for the behaviour of each policy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HighLatitudePolicy {
    /// Keep the schedule exactly as the sky gives it
    Disabled,
    /// Borrow the shape of the day from Mecca during abnormal periods
    Mecca,
    /// Borrow the shape of the day from Mecca all year round
    AlwaysMecca,
    /// Learn the average share of the night used by Fajr and Isha from normal days
    #[default]
    LocalRelativeEstimation,
    /// Repeat the last normal day throughout an abnormal period
    NearestDay,
    /// Borrow the shape of the day from latitude 45° during abnormal periods
    NearestLatitude,
    /// Use the schedule of latitude 45° for the whole year
    NearestLatitudeAsIs,
    /// Borrow from latitude 45° whenever the fasting span is not between 10h17m and 17h36m
    ShariNormalDay,
    /// Fajr and Isha take `angle / 60` of the night
    AngleBased,
    /// Fajr and Isha take a seventh of the night
    OneSeventhNight,
    /// Fajr and Isha meet in the middle of the night
    MiddleNight,
}

/// Output granularity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    /// Round to whole minutes, 30 seconds and above rounding up
    #[default]
    Minutes,
    /// Keep whole seconds
    Seconds,
}

/// Fixed offsets added to each marker after every other step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleCorrections {
    pub fajr: TimeDelta,
    pub sunrise: TimeDelta,
    pub zuhr: TimeDelta,
    pub asr: TimeDelta,
    pub maghrib: TimeDelta,
    pub isha: TimeDelta,
}

impl ScheduleCorrections {
    pub fn get(&self, marker: Marker) -> TimeDelta {
        match marker {
            Marker::Fajr => self.fajr,
            Marker::Sunrise => self.sunrise,
            Marker::Zuhr => self.zuhr,
            Marker::Asr => self.asr,
            Marker::Maghrib => self.maghrib,
            Marker::Isha => self.isha,
        }
    }

    pub fn is_zero(&self) -> bool {
        Marker::ALL.iter().all(|&m| self.get(m).is_zero())
    }
}

/// Everything a yearly calculation depends on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
    /// Height above sea level in meters; lowers the horizon for sunrise and sunset
    pub elevation: f64,
    /// Zone the civil days and output times are expressed in
    pub timezone: Tz,
    pub twilight: TwilightConvention,
    pub asr: AsrConvention,
    pub high_latitude_policy: HighLatitudePolicy,
    pub corrections: ScheduleCorrections,
    pub precision: Precision,
}

impl Config {
    /// Creates a configuration with default conventions for the given location.
    ///
    /// # Arguments
    ///
    /// * `latitude` - Latitude in degrees (positive North, negative South)
    /// * `longitude` - Longitude in degrees (positive East, negative West)
    /// * `timezone` - Zone used for civil days and output times
    pub fn new(latitude: f64, longitude: f64, timezone: Tz) -> Self {
        Self {
            latitude,
            longitude,
            elevation: 0.0,
            timezone,
            twilight: TwilightConvention::default(),
            asr: AsrConvention::default(),
            high_latitude_policy: HighLatitudePolicy::default(),
            corrections: ScheduleCorrections::default(),
            precision: Precision::default(),
        }
    }

    pub fn with_elevation(self, elevation: f64) -> Self {
        Self { elevation, ..self }
    }

    pub fn with_twilight(self, twilight: TwilightConvention) -> Self {
        Self { twilight, ..self }
    }

    pub fn with_method(self, method: CalculationMethod) -> Self {
        self.with_twilight(method.twilight())
    }

    pub fn with_asr(self, asr: AsrConvention) -> Self {
        Self { asr, ..self }
    }

    pub fn with_high_latitude_policy(self, policy: HighLatitudePolicy) -> Self {
        Self {
            high_latitude_policy: policy,
            ..self
        }
    }

    pub fn with_corrections(self, corrections: ScheduleCorrections) -> Self {
        Self { corrections, ..self }
    }

    pub fn with_precision(self, precision: Precision) -> Self {
        Self { precision, ..self }
    }

    /// Configuration for another place sharing this one's conventions, with
    /// high-latitude correction switched off.
    pub(crate) fn reference(&self, latitude: f64, longitude: f64, timezone: Tz) -> Self {
        Self {
            latitude,
            longitude,
            elevation: 0.0,
            timezone,
            twilight: self.twilight,
            asr: self.asr,
            high_latitude_policy: HighLatitudePolicy::Disabled,
            corrections: ScheduleCorrections::default(),
            precision: Precision::Seconds,
        }
    }

    /// Checks every parameter against its valid range.
    ///
    /// # Errors
    ///
    /// Returns the [`CalculationError`] naming the first parameter out of range.
    pub fn validate(&self) -> Result<(), CalculationError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CalculationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CalculationError::LongitudeOutOfRange);
        }
        if !(-EARTH_R..=EARTH_R).contains(&self.elevation) {
            return Err(CalculationError::ElevationOutOfRange);
        }
        for angle in [self.twilight.fajr_angle, self.twilight.isha_angle] {
            if !(0.0..90.0).contains(&angle) {
                return Err(CalculationError::TwilightAngleOutOfRange);
            }
        }
        if let Some(duration) = self.twilight.maghrib_duration {
            if duration <= TimeDelta::zero() || duration >= TimeDelta::hours(12) {
                return Err(CalculationError::MaghribDurationOutOfRange);
            }
        }
        Ok(())
    }
}
