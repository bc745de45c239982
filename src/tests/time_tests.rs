extern crate std;
use chrono::{TimeZone, Timelike};

use super::{date, utc, utc_hms};
use crate::time::{local_midnight, round_to_minute, seconds_between};

#[test]
fn seconds_between_instants_in_different_zones() {
    let start = utc(date(2023, 6, 1), 10, 0);
    let oslo = chrono_tz::Europe::Oslo.with_ymd_and_hms(2023, 6, 1, 12, 30, 15).unwrap();

    assert_eq!(seconds_between(&start, &oslo), 30.0 * 60.0 + 15.0);
    assert_eq!(seconds_between(&oslo, &start), -(30.0 * 60.0 + 15.0));
    assert_eq!(seconds_between(&start, &start), 0.0);
}

#[test]
fn seconds_between_keeps_milliseconds() {
    let start = utc(date(2023, 1, 1), 0, 0);
    let later = start + chrono::TimeDelta::milliseconds(1_500);
    assert_eq!(seconds_between(&start, &later), 1.5);
}

#[test]
fn midnight_skipped_by_daylight_saving_starts_at_the_first_hour() {
    // Brazil moved its clocks from 00:00 to 01:00 on this date
    let zone = chrono_tz::America::Sao_Paulo;
    let start = local_midnight(date(2018, 11, 4), zone).unwrap();
    assert_eq!(start.hour(), 1);
    assert_eq!(start, utc(date(2018, 11, 4), 3, 0));

    let regular = local_midnight(date(2018, 11, 5), zone).unwrap();
    assert_eq!(regular.hour(), 0);
}

#[test]
fn minutes_round_half_up() {
    let zone = chrono_tz::UTC;
    let at = |s: u32| utc_hms(date(2023, 3, 1), 4, 30, s).with_timezone(&zone);
    assert_eq!(round_to_minute(at(29)), at(0));
    assert_eq!(round_to_minute(at(30)), utc_hms(date(2023, 3, 1), 4, 31, 0).with_timezone(&zone));
}
