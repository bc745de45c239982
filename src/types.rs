use alloc::vec::Vec;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

/// One of the six daily prayer-time markers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Marker {
    /// Dawn, when the sun reaches the Fajr depression angle before sunrise
    Fajr,
    /// Top of the solar disk crosses the horizon in the morning
    Sunrise,
    /// Solar transit
    Zuhr,
    /// Afternoon prayer, defined by shadow length
    Asr,
    /// Top of the solar disk crosses the horizon in the evening
    Maghrib,
    /// Dusk, when the sun reaches the Isha depression angle after sunset
    Isha,
}

impl Marker {
    /// All markers in their chronological order within a day.
    pub const ALL: [Marker; 6] = [
        Marker::Fajr,
        Marker::Sunrise,
        Marker::Zuhr,
        Marker::Asr,
        Marker::Maghrib,
        Marker::Isha,
    ];

    /// Markers that are positioned relative to transit.
    pub const RELATIVE: [Marker; 5] = [Marker::Fajr, Marker::Sunrise, Marker::Asr, Marker::Maghrib, Marker::Isha];
}

/// Prayer times for one civil day.
///
/// A marker that does not occur on this day (the sun never reaches the required
/// elevation) is `None`. Once a schedule has been built, every present marker is
/// strictly later than the present markers before it in [`Marker::ALL`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Schedule {
    /// Civil date in the configured time zone
    pub date: NaiveDate,
    pub fajr: Option<DateTime<Tz>>,
    pub sunrise: Option<DateTime<Tz>>,
    pub zuhr: Option<DateTime<Tz>>,
    pub asr: Option<DateTime<Tz>>,
    pub maghrib: Option<DateTime<Tz>>,
    pub isha: Option<DateTime<Tz>>,
    /// Sunrise, sunset and the 18° astronomical dawn and dusk all occur on this day.
    ///
    /// This is a property of the sky at the location, not of the configured twilight
    /// angles.
    pub is_normal: bool,
}

impl Schedule {
    /// An empty, abnormal schedule for `date`.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            fajr: None,
            sunrise: None,
            zuhr: None,
            asr: None,
            maghrib: None,
            isha: None,
            is_normal: false,
        }
    }

    pub fn get(&self, marker: Marker) -> Option<DateTime<Tz>> {
        match marker {
            Marker::Fajr => self.fajr,
            Marker::Sunrise => self.sunrise,
            Marker::Zuhr => self.zuhr,
            Marker::Asr => self.asr,
            Marker::Maghrib => self.maghrib,
            Marker::Isha => self.isha,
        }
    }

    pub fn get_mut(&mut self, marker: Marker) -> &mut Option<DateTime<Tz>> {
        match marker {
            Marker::Fajr => &mut self.fajr,
            Marker::Sunrise => &mut self.sunrise,
            Marker::Zuhr => &mut self.zuhr,
            Marker::Asr => &mut self.asr,
            Marker::Maghrib => &mut self.maghrib,
            Marker::Isha => &mut self.isha,
        }
    }

    /// Returns `true` when all six markers are present.
    pub fn is_complete(&self) -> bool {
        Marker::ALL.iter().all(|&m| self.get(m).is_some())
    }

    /// Returns `true` when the present markers are strictly increasing.
    pub fn is_ordered(&self) -> bool {
        let mut previous: Option<DateTime<Tz>> = None;
        for marker in Marker::ALL {
            if let Some(time) = self.get(marker) {
                if previous.is_some_and(|p| p >= time) {
                    return false;
                }
                previous = Some(time);
            }
        }
        true
    }

    /// Returns `true` when any of Fajr, Sunrise, Maghrib or Isha is absent.
    pub fn has_missing_twilight(&self) -> bool {
        self.fajr.is_none() || self.sunrise.is_none() || self.maghrib.is_none() || self.isha.is_none()
    }
}

/// Season an abnormal period is attributed to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Season {
    Summer,
    Winter,
}

/// A maximal run of consecutive abnormal days, taken circularly over the year.
///
/// `indexes` are positions in the year's schedule array in chronological order.
/// A run that crosses the new year starts near the end of the array and continues
/// from index 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbnormalRange {
    pub season: Season,
    pub indexes: Vec<usize>,
}

impl AbnormalRange {
    pub fn empty(season: Season) -> Self {
        Self {
            season,
            indexes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// First day of the range.
    pub fn first(&self) -> Option<usize> {
        self.indexes.first().copied()
    }

    /// Last day of the range.
    pub fn last(&self) -> Option<usize> {
        self.indexes.last().copied()
    }
}

/// The (at most) two abnormal periods of a year.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbnormalRanges {
    pub summer: AbnormalRange,
    pub winter: AbnormalRange,
}

impl Default for AbnormalRanges {
    fn default() -> Self {
        Self {
            summer: AbnormalRange::empty(Season::Summer),
            winter: AbnormalRange::empty(Season::Winter),
        }
    }
}

impl AbnormalRanges {
    /// Non-empty ranges, summer first.
    pub fn iter(&self) -> impl Iterator<Item = &AbnormalRange> {
        [&self.summer, &self.winter].into_iter().filter(|r| !r.is_empty())
    }

    /// Marks every day that belongs to one of the ranges.
    pub fn mask(&self, len: usize) -> Vec<bool> {
        let mut mask = alloc::vec![false; len];
        for range in self.iter() {
            for &idx in &range.indexes {
                if let Some(slot) = mask.get_mut(idx) {
                    *slot = true;
                }
            }
        }
        mask
    }
}
