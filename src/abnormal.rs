//! Detection of the abnormal periods of a year.

use alloc::vec::Vec;
use chrono::{Datelike, NaiveDate};

use crate::interpolate::group_circular_runs;
use crate::types::{AbnormalRange, AbnormalRanges, Schedule, Season};

const SUMMER_MONTHS: [u32; 3] = [6, 7, 8];
const WINTER_MONTHS: [u32; 3] = [12, 1, 2];

/// Splits the days that are not [`Schedule::is_normal`] into at most one summer
/// and one winter period.
///
/// Consecutive abnormal days form a range, with the ranges at both ends of the
/// year joined into one. Each range is scored by which of June, July, August
/// (summer) and December, January, February (winter) it touches. A range touching
/// all three months of a season, or more months of one season than of the other,
/// is attributed to that season.
///
/// A range touching as many summer as winter months is attributed to the season
/// whose solstice is closest to its middle day. When two ranges end up in the
/// same season, the longer one is kept.
pub fn extract_abnormal_ranges(schedules: &[Schedule]) -> AbnormalRanges {
    let mut result = AbnormalRanges::default();
    if schedules.is_empty() {
        return result;
    }

    let mask: Vec<bool> = schedules.iter().map(|s| !s.is_normal).collect();
    for indexes in group_circular_runs(&mask) {
        let season = classify(schedules, &indexes);
        let slot = match season {
            Season::Summer => &mut result.summer,
            Season::Winter => &mut result.winter,
        };
        if slot.is_empty() {
            *slot = AbnormalRange { season, indexes };
        } else {
            log::warn!(
                "two abnormal {:?} ranges of {} and {} days, keeping the longer one",
                season,
                slot.len(),
                indexes.len()
            );
            if indexes.len() > slot.len() {
                *slot = AbnormalRange { season, indexes };
            }
        }
    }

    log::debug!(
        "abnormal ranges: {} summer days, {} winter days",
        result.summer.len(),
        result.winter.len()
    );
    result
}

fn classify(schedules: &[Schedule], indexes: &[usize]) -> Season {
    let mut months = [false; 12];
    for &idx in indexes {
        months[schedules[idx].date.month0() as usize] = true;
    }
    let score = |season: [u32; 3]| season.iter().filter(|&&m| months[m as usize - 1]).count();
    let summer = score(SUMMER_MONTHS);
    let winter = score(WINTER_MONTHS);

    if summer == 3 || summer > winter {
        Season::Summer
    } else if winter == 3 || winter > summer {
        Season::Winter
    } else {
        let middle = schedules[indexes[indexes.len() / 2]].date;
        let season = nearest_solstice(middle);
        log::warn!(
            "abnormal range of {} days around {} touches as many summer as winter months, attributing it to {:?}",
            indexes.len(),
            middle,
            season
        );
        season
    }
}

/// Season of the solstice (21 June or 21 December) closest to `date`.
fn nearest_solstice(date: NaiveDate) -> Season {
    let day = date.ordinal0() as i64;
    let year_length = NaiveDate::from_ymd_opt(date.year(), 12, 31).map_or(365, |d| i64::from(d.ordinal()));
    let distance = |month: u32| {
        let solstice = NaiveDate::from_ymd_opt(date.year(), month, 21).map_or(0, |d| d.ordinal0() as i64);
        let forward = (day - solstice).rem_euclid(year_length);
        forward.min(year_length - forward)
    };

    // southern hemisphere anomalies are still named after the northern calendar
    if distance(6) <= distance(12) {
        Season::Summer
    } else {
        Season::Winter
    }
}
