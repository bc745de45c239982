//! Helpers over circular, partially-populated yearly series.
//!
//! A year's schedule is treated as a ring: the day before index 0 is the last day
//! of the array and the day after the last index is index 0. The series handled
//! here are signed offsets in seconds from each day's transit, which vary slowly
//! from one day to the next even when the wall-clock time does not.

use alloc::vec::Vec;
#[allow(unused_imports)]
use core_maths::CoreFloat;

/// Days of transition allowed on each side of a corrected run.
pub const MAX_TRANSITION_DAYS: usize = 30;

/// Maps a possibly negative or overflowing index onto `0..len`.
///
/// # Panics
///
/// Panics when `len` is zero.
pub fn wrap(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

/// Index `offset` days away from `index` on a ring of `len` days.
pub(crate) fn step(index: usize, offset: isize, len: usize) -> usize {
    wrap(index as isize + offset, len)
}

/// Groups the indexes flagged `true` into maximal consecutive runs.
///
/// A run touching both ends of the array is merged into one run that starts in
/// the tail and continues from index 0. Runs are returned in order of their
/// first index, except that a merged run comes first.
pub fn group_circular_runs(mask: &[bool]) -> Vec<Vec<usize>> {
    let mut runs: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for (idx, &flagged) in mask.iter().enumerate() {
        if flagged {
            current.push(idx);
        } else if !current.is_empty() {
            runs.push(core::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        let touches_start = runs.first().and_then(|r| r.first()) == Some(&0);
        if touches_start {
            current.append(&mut runs[0]);
            runs[0] = current;
        } else {
            runs.push(current);
        }
    }
    runs
}

/// Fills one missing run from the known values around it.
///
/// `anchors[i]` says whether `values[i]` may serve as a boundary. The run is
/// filled according to what surrounds it:
///
/// - both neighbours known: two walks from the neighbours meet at the middle of
///   the run with equal steps, i.e. a straight line between them;
/// - one neighbour and the one beyond it known: the rate of change between those
///   two days is extended across the run;
/// - a single neighbour known: its value is held across the run;
/// - nothing known: the run stays empty.
pub fn fill_bounded(values: &mut [Option<f64>], anchors: &[bool], run: &[usize]) {
    let len = values.len();
    let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
        return;
    };
    if run.len() >= len {
        return;
    }

    let known = |idx: usize| -> Option<f64> {
        if anchors.get(idx).copied().unwrap_or(false) {
            values[idx]
        } else {
            None
        }
    };
    let left_idx = step(first, -1, len);
    let right_idx = step(last, 1, len);
    let left = known(left_idx);
    let right = known(right_idx);
    let n = run.len();

    match (left, right) {
        (Some(left), Some(right)) => {
            let delta = (right - left) / (n + 1) as f64;
            let half = n / 2;
            for (k, &idx) in run.iter().enumerate().take(half) {
                values[idx] = Some(left + delta * (k + 1) as f64);
            }
            for (k, &idx) in run.iter().enumerate().skip(half).rev() {
                values[idx] = Some(right - delta * (n - k) as f64);
            }
        }
        (Some(left), None) => {
            let rate = known(step(left_idx, -1, len)).map_or(0.0, |before| left - before);
            for (k, &idx) in run.iter().enumerate() {
                values[idx] = Some(left + rate * (k + 1) as f64);
            }
        }
        (None, Some(right)) => {
            let rate = known(step(right_idx, 1, len)).map_or(0.0, |after| after - right);
            for (k, &idx) in run.iter().rev().enumerate() {
                values[idx] = Some(right - rate * (k + 1) as f64);
            }
        }
        (None, None) => {}
    }
}

/// Fills every missing stretch of `values`, using only the values present before
/// the call as boundaries.
pub fn fill_missing(values: &mut [Option<f64>]) {
    let anchors: Vec<bool> = values.iter().map(Option::is_some).collect();
    let missing: Vec<bool> = anchors.iter().map(|&a| !a).collect();
    for run in group_circular_runs(&missing) {
        fill_bounded(values, &anchors, &run);
    }
}

/// Number of untouched days between each run and its circular neighbours,
/// as `(before, after)` pairs in the order of `runs`.
fn gaps(runs: &[Vec<usize>], len: usize) -> Vec<(usize, usize)> {
    let mut bounds: Vec<(usize, usize, usize)> = runs
        .iter()
        .enumerate()
        .filter_map(|(i, run)| Some((i, *run.first()?, *run.last()?)))
        .collect();
    bounds.sort_by_key(|&(_, first, _)| first);

    let mut result = alloc::vec![(0, 0); runs.len()];
    let count = bounds.len();
    for (k, &(i, first, last)) in bounds.iter().enumerate() {
        let (_, _, previous_last) = bounds[(k + count - 1) % count];
        let (_, next_first, _) = bounds[(k + 1) % count];
        let before = wrap(first as isize - previous_last as isize - 1, len);
        let after = wrap(next_first as isize - last as isize - 1, len);
        result[i] = (before, after);
    }
    result
}

/// Eases the seams between corrected runs and the untouched values around them.
///
/// Working outward from each edge of each run, a neighbouring value further than
/// `cap` from the day next to it is pulled to exactly `cap` away, and the walk
/// continues until a value is already within `cap`. Each side of a run may use
/// at most `min(30, gap / 2)` days, where `gap` counts the untouched days between
/// the run and the next run on that side, so two runs never compete for the same
/// days.
///
/// A window that runs out before meeting the untouched curve is then pulled back
/// from the first day past it, through the window and into the run, again at
/// most `cap` per day. Values inside the runs only change in that case.
pub fn smooth_transitions(values: &mut [Option<f64>], runs: &[Vec<usize>], cap: f64) {
    let len = values.len();
    if len == 0 || runs.is_empty() {
        return;
    }

    let mut open_windows = Vec::new();
    for (run, (gap_before, gap_after)) in runs.iter().zip(gaps(runs, len)) {
        let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
            continue;
        };
        if run.len() >= len {
            continue;
        }
        let before = (gap_before / 2).min(MAX_TRANSITION_DAYS);
        let after = (gap_after / 2).min(MAX_TRANSITION_DAYS);
        if let Some(outer) = ease_outward(values, first, -1, before, cap) {
            open_windows.push((outer, -1, before + run.len()));
        }
        if let Some(outer) = ease_outward(values, last, 1, after, cap) {
            open_windows.push((outer, 1, after + run.len()));
        }
    }

    // neighbouring windows meet halfway, so seams are only known once every
    // run has walked
    for (outer, direction, limit) in open_windows {
        pull_inward(values, outer, direction, limit, cap);
    }
}

/// Walks up to `budget` days away from `edge` in `direction`, clamping each day
/// to within `cap` of the day before it in the walk.
///
/// Returns the outermost day of the window when the whole budget was used.
fn ease_outward(values: &mut [Option<f64>], edge: usize, direction: isize, budget: usize, cap: f64) -> Option<usize> {
    let len = values.len();
    let mut inner = edge;
    for _ in 0..budget {
        let idx = step(inner, direction, len);
        let (Some(reference), Some(current)) = (values[inner], values[idx]) else {
            return None;
        };
        if (current - reference).abs() <= cap {
            return None;
        }
        values[idx] = Some(reference + cap * (current - reference).signum());
        inner = idx;
    }
    Some(inner)
}

/// Walks back from the day past `outer` for at most `limit` days, pulling each
/// day to within `cap` of the one outside it, until a day already is.
fn pull_inward(values: &mut [Option<f64>], outer: usize, direction: isize, limit: usize, cap: f64) {
    let len = values.len();
    let mut anchor = step(outer, direction, len);
    let mut idx = outer;
    for _ in 0..limit {
        let (Some(reference), Some(current)) = (values[anchor], values[idx]) else {
            return;
        };
        if (current - reference).abs() <= cap {
            return;
        }
        values[idx] = Some(reference + cap * (current - reference).signum());
        anchor = idx;
        idx = step(idx, -direction, len);
    }

    if let (Some(reference), Some(current)) = (values[anchor], values[idx]) {
        let seam = (current - reference).abs();
        if seam > cap {
            log::warn!("transition ending at day {outer} leaves a {seam:.0}s seam at day {idx}");
        }
    }
}

/// Replaces the values of each run by the series closest to them that stays
/// within `cap` per day of itself and of the untouched days on both sides.
///
/// The walk goes forward from the day before the run, clamping each day to the
/// previous one and to what can still reach the day after the run at `cap` per
/// day, so the run ends within `cap` of it whenever the two boundaries are close
/// enough for that. Days of a run without a value carry the previous one.
/// Values outside the runs are never changed.
pub fn fit_runs(values: &mut [Option<f64>], runs: &[Vec<usize>], cap: f64) {
    let len = values.len();
    for run in runs {
        let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
            continue;
        };
        if run.len() >= len {
            continue;
        }
        let after = values[step(last, 1, len)];
        let mut previous = values[step(first, -1, len)];
        for (k, &idx) in run.iter().enumerate() {
            let Some(mut value) = values[idx].or(previous) else {
                continue;
            };
            if let Some(after) = after {
                let reach = (run.len() - k) as f64 * cap;
                value = value.clamp(after - reach, after + reach);
            }
            if let Some(previous) = previous {
                value = value.clamp(previous - cap, previous + cap);
            }
            values[idx] = Some(value);
            previous = Some(value);
        }
    }
}
