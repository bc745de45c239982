use alloc::vec::Vec;

use crate::abnormal::extract_abnormal_ranges;
use crate::interpolate::step;
use crate::time::shift_days;
use crate::types::{Marker, Schedule};

/// Every day of an abnormal range repeats the wall-clock times of the day just
/// before the range.
pub(crate) fn apply(mut schedules: Vec<Schedule>) -> Vec<Schedule> {
    let len = schedules.len();
    let ranges = extract_abnormal_ranges(&schedules);
    for range in ranges.iter() {
        let Some(first) = range.first() else {
            continue;
        };
        let source = schedules[step(first, -1, len)].clone();
        if !source.is_normal {
            log::warn!("day before the abnormal range starting {} is not normal", schedules[first].date);
        }

        for &idx in &range.indexes {
            let target = &mut schedules[idx];
            let days = (target.date - source.date).num_days();
            for marker in Marker::ALL {
                *target.get_mut(marker) = source.get(marker).map(|time| shift_days(time, days));
            }
        }
    }
    schedules
}
