//! Turns a year of solar events into daily schedules.

use alloc::vec::Vec;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::config::Config;
use crate::interpolate::step;
use crate::solar::{Elevation, Location, SolarEventProvider, SunEventRequest};
use crate::types::{Marker, Schedule};
use crate::CalculationError;

/// Depression of the sun, in degrees, marking astronomical dawn and dusk.
pub const ASTRONOMICAL_TWILIGHT: f64 = 18.0;

const DAWN: usize = 0;
const DUSK: usize = 1;
const FAJR: usize = 2;
const ISHA: usize = 3;
const ASR: usize = 4;

fn day_requests(config: &Config) -> [SunEventRequest; 5] {
    let mut requests = [SunEventRequest::morning(Elevation::Fixed(0.0)); 5];
    requests[DAWN] = SunEventRequest::morning(Elevation::Fixed(-ASTRONOMICAL_TWILIGHT));
    requests[DUSK] = SunEventRequest::evening(Elevation::Fixed(-ASTRONOMICAL_TWILIGHT));
    requests[FAJR] = SunEventRequest::morning(Elevation::Fixed(-config.twilight.fajr_angle));
    requests[ISHA] = SunEventRequest::evening(Elevation::Fixed(-config.twilight.isha_angle));
    requests[ASR] = SunEventRequest::evening(Elevation::Shadow(config.asr.shadow_factor()));
    requests
}

/// One padded day while the year is being assembled.
#[derive(Clone, Debug)]
struct Slot {
    schedule: Schedule,
    dawn: bool,
    dusk: bool,
}

/// First day of `year` and the number of days in it.
pub(crate) fn year_bounds(year: i32) -> Result<(NaiveDate, usize), CalculationError> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CalculationError::YearOutOfRange)?;
    let next = year
        .checked_add(1)
        .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        .ok_or(CalculationError::YearOutOfRange)?;
    Ok((first, (next - first).num_days() as usize))
}

/// Index an event belongs to: a morning event found after transit belongs to
/// the next day, an evening event found before transit to the previous one.
fn chained_index(index: usize, len: usize, event: DateTime<Utc>, transit: DateTime<Utc>, before_transit: bool) -> usize {
    if before_transit && event > transit {
        step(index, 1, len)
    } else if !before_transit && event < transit {
        step(index, -1, len)
    } else {
        index
    }
}

/// Builds the raw schedules of every civil day of `year`.
///
/// Solar events are requested for the year plus one padding day on each side, so
/// events that belong to a neighbouring day can be moved there. Markers that break
/// the daily order are then dropped, a fixed Maghrib to Isha delay is applied when
/// the convention has one, and the padding is removed.
///
/// # Arguments
///
/// * `provider` - Source of solar events
/// * `config` - Location and conventions; the high-latitude policy is ignored
/// * `year` - Calendar year in the configured time zone
///
/// # Returns
///
/// The schedules of the year, and the number of days missing at least one of
/// Fajr, Sunrise, Maghrib and Isha.
///
/// # Errors
///
/// Any provider failure aborts the whole year and is returned as is.
pub fn build_year<P: SolarEventProvider + ?Sized>(
    provider: &P,
    config: &Config,
    year: i32,
) -> Result<(Vec<Schedule>, usize), CalculationError> {
    let (first_day, days_in_year) = year_bounds(year)?;
    let start = first_day.pred_opt().ok_or(CalculationError::YearOutOfRange)?;
    let len = days_in_year + 2;
    let timezone = config.timezone;
    let location = Location::from(config);
    let requests = day_requests(config);

    let mut slots: Vec<Slot> = start
        .iter_days()
        .take(len)
        .map(|date| Slot {
            schedule: Schedule::empty(date),
            dawn: false,
            dusk: false,
        })
        .collect();

    for (idx, date) in start.iter_days().take(len).enumerate() {
        let events = provider.sun_events(date, timezone, &location, &requests)?;
        let transit = events.transit;
        let local = |t: DateTime<Utc>| t.with_timezone(&timezone);
        let custom = |i: usize| events.custom.get(i).copied().flatten();

        slots[idx].schedule.zuhr = Some(local(transit));
        if let Some(asr) = custom(ASR) {
            slots[idx].schedule.asr = Some(local(asr));
        }

        for (event, marker) in [(events.sunrise, Marker::Sunrise), (custom(FAJR), Marker::Fajr)] {
            if let Some(t) = event {
                let target = chained_index(idx, len, t, transit, true);
                *slots[target].schedule.get_mut(marker) = Some(local(t));
            }
        }
        for (event, marker) in [(events.sunset, Marker::Maghrib), (custom(ISHA), Marker::Isha)] {
            if let Some(t) = event {
                let target = chained_index(idx, len, t, transit, false);
                *slots[target].schedule.get_mut(marker) = Some(local(t));
            }
        }
        if let Some(t) = custom(DAWN) {
            slots[chained_index(idx, len, t, transit, true)].dawn = true;
        }
        if let Some(t) = custom(DUSK) {
            slots[chained_index(idx, len, t, transit, false)].dusk = true;
        }
    }

    for slot in &mut slots {
        enforce_order(&mut slot.schedule);
        let s = &mut slot.schedule;
        s.is_normal = s.sunrise.is_some() && s.maghrib.is_some() && slot.dawn && slot.dusk;
        if let (Some(duration), Some(maghrib)) = (config.twilight.maghrib_duration, s.maghrib) {
            s.isha = Some(maghrib + duration);
        }
    }

    let schedules: Vec<Schedule> = slots
        .into_iter()
        .skip(1)
        .take(days_in_year)
        .map(|slot| slot.schedule)
        .collect();
    let abnormal_day_count = schedules.iter().filter(|s| s.has_missing_twilight()).count();
    log::debug!(
        "built {} days for {} at ({}, {}), {} with missing markers",
        schedules.len(),
        year,
        config.latitude,
        config.longitude,
        abnormal_day_count
    );
    Ok((schedules, abnormal_day_count))
}

/// Drops the markers that are out of order relative to transit and their
/// neighbours.
pub(crate) fn enforce_order(s: &mut Schedule) {
    let Some(zuhr) = s.zuhr else {
        return;
    };
    let before = |a: Option<DateTime<Tz>>, b: Option<DateTime<Tz>>| match (a, b) {
        (Some(a), Some(b)) => a < b,
        _ => true,
    };

    if s.fajr.is_some_and(|f| f >= zuhr) || !before(s.fajr, s.sunrise) {
        s.fajr = None;
    }
    if s.sunrise.is_some_and(|r| r >= zuhr) {
        s.sunrise = None;
    }
    if s.maghrib.is_some_and(|m| m <= zuhr) {
        s.maghrib = None;
    }
    if s.isha.is_some_and(|i| i <= zuhr) || !before(s.maghrib, s.isha) {
        s.isha = None;
    }
    if s.asr.is_some_and(|a| a <= zuhr) || !before(s.asr, s.maghrib) {
        s.asr = None;
    }
    if !before(s.asr, s.isha) {
        s.isha = None;
    }
}
