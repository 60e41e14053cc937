//! Next occurrence arithmetic for every repeat policy.
//!
//! All functions work on wall clock time in the owner's timezone and are
//! pure: the same input always gives the same output. A time of day counts
//! as passed when the current minute has reached it, so a reminder for
//! 09:00 created at 09:00:10 is scheduled for the next cycle.

use crate::date::{clamp_day, clamped_date, next_month};
use crate::Repeat;
use chrono::prelude::*;
use chrono::{Duration, LocalResult};
use chrono_tz::Tz;

pub fn has_passed(now: &DateTime<Tz>, time: NaiveTime) -> bool {
    now.hour() > time.hour() || (now.hour() == time.hour() && now.minute() >= time.minute())
}

/// Resolves a wall clock time in the given timezone. Ambiguous times
/// (clocks turned back) pick the earlier instant and times skipped by a
/// DST gap are moved forward past the gap.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut shifted = naive;
            for _ in 0..8 {
                shifted += Duration::minutes(30);
                if let Some(dt) = tz.from_local_datetime(&shifted).earliest() {
                    return dt;
                }
            }
            tz.from_utc_datetime(&naive)
        }
    }
}

fn at(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    localize(tz, date.and_time(time))
}

/// Today at `time`, or tomorrow when that is not after `now`
pub fn next_today(now: &DateTime<Tz>, time: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();
    let candidate = at(&tz, today, time);
    if candidate > *now {
        candidate
    } else {
        at(&tz, today + Duration::days(1), time)
    }
}

pub fn next_tomorrow(now: &DateTime<Tz>, time: NaiveTime) -> DateTime<Tz> {
    at(&now.timezone(), now.date_naive() + Duration::days(1), time)
}

pub fn next_daily(now: &DateTime<Tz>, time: NaiveTime) -> DateTime<Tz> {
    next_today(now, time)
}

pub fn next_weekly(now: &DateTime<Tz>, time: NaiveTime, weekday: Weekday) -> DateTime<Tz> {
    let current = now.weekday().num_days_from_sunday() as i64;
    let target = weekday.num_days_from_sunday() as i64;
    let mut days = (target - current + 7) % 7;
    if days == 0 && has_passed(now, time) {
        days = 7;
    }
    at(&now.timezone(), now.date_naive() + Duration::days(days), time)
}

/// The next `day` of a month. Months shorter than `day` use their last day.
pub fn next_monthly(now: &DateTime<Tz>, time: NaiveTime, day: u32) -> DateTime<Tz> {
    let (mut year, mut month) = (now.year(), now.month());
    let this_month_day = clamp_day(year, month, day);
    if now.day() > this_month_day || (now.day() == this_month_day && has_passed(now, time)) {
        (year, month) = next_month(year, month);
    }
    at(&now.timezone(), clamped_date(year, month, day), time)
}

/// The next `day.month`. The 29th of February falls on the 28th in common years.
pub fn next_yearly(now: &DateTime<Tz>, time: NaiveTime, day: u32, month: u32) -> DateTime<Tz> {
    let mut year = now.year();
    let this_year_day = clamp_day(year, month, day);
    let passed = now.month() > month
        || (now.month() == month
            && (now.day() > this_year_day
                || (now.day() == this_year_day && has_passed(now, time))));
    if passed {
        year += 1;
    }
    at(&now.timezone(), clamped_date(year, month, day), time)
}

/// Occurrences anchored on `start` every `interval` days; the first one
/// after `now` is returned. Anchoring on the start date keeps the cycle
/// from drifting no matter when it is computed.
pub fn next_every_n_days(
    now: &DateTime<Tz>,
    start: NaiveDate,
    time: NaiveTime,
    interval: u32,
) -> DateTime<Tz> {
    let tz = now.timezone();
    let interval = i64::from(interval.max(1));
    let mut date = start;
    let elapsed = (now.date_naive() - start).num_days();
    if elapsed > interval {
        date += Duration::days((elapsed / interval - 1) * interval);
    }
    loop {
        let candidate = at(&tz, date, time);
        if candidate > *now {
            return candidate;
        }
        date += Duration::days(interval);
    }
}

/// A one-shot date pinned to the calendar, which may lie in the past
pub fn on_date(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    at(tz, date, time)
}

/// The occurrence right after `from` for the given policy at the
/// configured wall clock `time`, `None` for one-shot reminders. Monthly
/// and yearly policies re-anchor on their configured day and every
/// policy re-anchors on `time`, so neither a clamped short month nor a
/// DST gap shifts later occurrences.
pub fn step(repeat: &Repeat, from: &DateTime<Tz>, time: NaiveTime) -> Option<DateTime<Tz>> {
    let tz = from.timezone();
    let date = from.date_naive();
    let next = match repeat {
        Repeat::None => return None,
        Repeat::Daily => at(&tz, date + Duration::days(1), time),
        Repeat::Weekly { .. } => at(&tz, date + Duration::days(7), time),
        Repeat::Monthly { day } => {
            let (year, month) = next_month(date.year(), date.month());
            at(&tz, clamped_date(year, month, *day), time)
        }
        Repeat::EveryNDays { interval } => {
            at(&tz, date + Duration::days(i64::from((*interval).max(1))), time)
        }
        Repeat::Yearly { day, month } => at(&tz, clamped_date(date.year() + 1, *month, *day), time),
    };
    Some(next)
}

/// Advances `scheduled` one cycle at a time until it is strictly after
/// `now`. Always advances at least once, so a reminder that just fired
/// never gets the same instant again.
pub fn catch_up(
    repeat: &Repeat,
    scheduled: &DateTime<Tz>,
    time: NaiveTime,
    now: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let mut next = step(repeat, scheduled, time)?;
    while next <= *now {
        next = step(repeat, &next, time)?;
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{America::New_York, Europe::Moscow, UTC};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Tz> {
        UTC.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn today_rolls_forward_when_passed() {
        // Monday 2 June 2025
        let now = utc(2025, 6, 2, 10, 0, 0);
        assert_eq!(next_today(&now, time(11, 0)), utc(2025, 6, 2, 11, 0, 0));
        assert_eq!(next_today(&now, time(9, 0)), utc(2025, 6, 3, 9, 0, 0));
        // Exact minute counts as passed
        assert_eq!(next_today(&now, time(10, 0)), utc(2025, 6, 3, 10, 0, 0));
    }

    #[test]
    fn tomorrow_is_unconditional() {
        let now = utc(2025, 6, 2, 10, 0, 0);
        assert_eq!(next_tomorrow(&now, time(11, 0)), utc(2025, 6, 3, 11, 0, 0));
        assert_eq!(next_tomorrow(&now, time(9, 0)), utc(2025, 6, 3, 9, 0, 0));
    }

    #[test]
    fn daily_crosses_month_and_year_boundaries() {
        let now = utc(2025, 12, 31, 23, 30, 0);
        assert_eq!(next_daily(&now, time(9, 0)), utc(2026, 1, 1, 9, 0, 0));
    }

    #[test]
    fn weekly_same_day_passed_is_one_week_later() {
        let now = utc(2025, 6, 2, 10, 30, 0);
        assert_eq!(now.weekday(), Weekday::Mon);
        assert_eq!(
            next_weekly(&now, time(9, 0), Weekday::Mon),
            utc(2025, 6, 9, 9, 0, 0)
        );
        assert_eq!(
            next_weekly(&now, time(10, 30), Weekday::Mon),
            utc(2025, 6, 9, 10, 30, 0)
        );
    }

    #[test]
    fn weekly_same_day_upcoming_is_today() {
        let now = utc(2025, 6, 2, 10, 30, 0);
        assert_eq!(
            next_weekly(&now, time(10, 31), Weekday::Mon),
            utc(2025, 6, 2, 10, 31, 0)
        );
    }

    #[test]
    fn weekly_other_days() {
        let now = utc(2025, 6, 2, 10, 30, 0);
        assert_eq!(
            next_weekly(&now, time(9, 0), Weekday::Wed),
            utc(2025, 6, 4, 9, 0, 0)
        );
        assert_eq!(
            next_weekly(&now, time(9, 0), Weekday::Sun),
            utc(2025, 6, 8, 9, 0, 0)
        );
    }

    #[test]
    fn monthly_this_month_or_next() {
        let now = utc(2025, 6, 15, 12, 0, 0);
        assert_eq!(next_monthly(&now, time(9, 0), 20), utc(2025, 6, 20, 9, 0, 0));
        assert_eq!(next_monthly(&now, time(9, 0), 10), utc(2025, 7, 10, 9, 0, 0));
        assert_eq!(next_monthly(&now, time(12, 0), 15), utc(2025, 7, 15, 12, 0, 0));
        assert_eq!(next_monthly(&now, time(13, 0), 15), utc(2025, 6, 15, 13, 0, 0));
    }

    #[test]
    fn monthly_wraps_december() {
        let now = utc(2025, 12, 20, 12, 0, 0);
        assert_eq!(next_monthly(&now, time(9, 0), 5), utc(2026, 1, 5, 9, 0, 0));
    }

    #[test]
    fn monthly_clamps_to_short_months() {
        // April has 30 days
        let now = utc(2025, 4, 10, 12, 0, 0);
        assert_eq!(next_monthly(&now, time(9, 0), 31), utc(2025, 4, 30, 9, 0, 0));

        let now = utc(2025, 4, 30, 12, 0, 0);
        assert_eq!(next_monthly(&now, time(9, 0), 31), utc(2025, 5, 31, 9, 0, 0));

        let now = utc(2025, 1, 31, 12, 0, 0);
        assert_eq!(next_monthly(&now, time(9, 0), 31), utc(2025, 2, 28, 9, 0, 0));
        let now = utc(2024, 1, 31, 12, 0, 0);
        assert_eq!(next_monthly(&now, time(9, 0), 31), utc(2024, 2, 29, 9, 0, 0));
    }

    #[test]
    fn yearly_this_year_or_next() {
        let now = utc(2025, 6, 13, 12, 0, 0);
        assert_eq!(next_yearly(&now, time(9, 0), 14, 6), utc(2025, 6, 14, 9, 0, 0));
        assert_eq!(next_yearly(&now, time(9, 0), 13, 6), utc(2026, 6, 13, 9, 0, 0));
        assert_eq!(next_yearly(&now, time(13, 0), 13, 6), utc(2025, 6, 13, 13, 0, 0));
        assert_eq!(next_yearly(&now, time(9, 0), 1, 1), utc(2026, 1, 1, 9, 0, 0));
        assert_eq!(next_yearly(&now, time(9, 0), 1, 12), utc(2025, 12, 1, 9, 0, 0));
    }

    #[test]
    fn yearly_leap_day_in_common_year() {
        let now = utc(2025, 1, 1, 12, 0, 0);
        assert_eq!(next_yearly(&now, time(9, 0), 29, 2), utc(2025, 2, 28, 9, 0, 0));
        let now = utc(2027, 3, 1, 12, 0, 0);
        assert_eq!(next_yearly(&now, time(9, 0), 29, 2), utc(2028, 2, 29, 9, 0, 0));
    }

    #[test]
    fn every_n_days_starts_on_the_start_date() {
        let now = utc(2025, 6, 2, 10, 0, 0);
        let start = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        assert_eq!(
            next_every_n_days(&now, start, time(9, 0), 3),
            utc(2025, 6, 5, 9, 0, 0)
        );
    }

    #[test]
    fn every_n_days_stays_on_cycle_for_past_start() {
        let now = utc(2025, 6, 2, 10, 0, 0);
        let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        // 1 May + 3k days: ..., 28 May, 31 May, 3 June, 6 June
        assert_eq!(
            next_every_n_days(&now, start, time(9, 0), 3),
            utc(2025, 6, 3, 9, 0, 0)
        );
        let now = utc(2025, 6, 3, 10, 0, 0);
        assert_eq!(
            next_every_n_days(&now, start, time(11, 0), 3),
            utc(2025, 6, 3, 11, 0, 0)
        );
        assert_eq!(
            next_every_n_days(&now, start, time(9, 0), 3),
            utc(2025, 6, 6, 9, 0, 0)
        );
    }

    #[test]
    fn on_date_is_literal() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 13).unwrap();
        assert_eq!(
            on_date(&Moscow, date, time(15, 30)),
            Moscow.with_ymd_and_hms(2025, 6, 13, 15, 30, 0).unwrap()
        );
    }

    #[test]
    fn computed_times_are_strictly_after_now() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        for hour in 0..24 {
            for minute in [0, 29, 59] {
                let now = Moscow.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).unwrap();
                for t in [time(0, 0), time(hour, minute), time(23, 59)] {
                    assert!(next_today(&now, t) > now);
                    assert!(next_tomorrow(&now, t) > now);
                    assert!(next_daily(&now, t) > now);
                    assert!(next_weekly(&now, t, now.weekday()) > now);
                    assert!(next_monthly(&now, t, 2) > now);
                    assert!(next_monthly(&now, t, 31) > now);
                    assert!(next_yearly(&now, t, 2, 6) > now);
                    assert!(next_every_n_days(&now, start, t, 5) > now);
                }
            }
        }
    }

    #[test]
    fn pure_functions_are_idempotent() {
        let now = utc(2025, 6, 2, 10, 0, 0);
        assert_eq!(
            next_weekly(&now, time(9, 0), Weekday::Fri),
            next_weekly(&now, time(9, 0), Weekday::Fri)
        );
        assert_eq!(next_monthly(&now, time(9, 0), 31), next_monthly(&now, time(9, 0), 31));
    }

    #[test]
    fn keeps_wall_clock_across_dst() {
        // New York springs forward on 9 March 2025
        let now = New_York.with_ymd_and_hms(2025, 3, 8, 10, 0, 0).unwrap();
        let next = next_daily(&now, time(9, 0));
        assert_eq!(next, New_York.with_ymd_and_hms(2025, 3, 9, 9, 0, 0).unwrap());
        assert_eq!(step(&Repeat::Daily, &next, time(9, 0)).unwrap().hour(), 9);
    }

    #[test]
    fn skipped_wall_clock_moves_past_the_gap() {
        // 02:30 does not exist on 9 March 2025 in New York
        let naive = NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_time(time(2, 30));
        let resolved = localize(&New_York, naive);
        assert_eq!(resolved.hour(), 3);
    }

    #[test]
    fn returns_to_configured_time_after_dst_gap() {
        let first = next_daily(
            &New_York.with_ymd_and_hms(2025, 3, 8, 10, 0, 0).unwrap(),
            time(2, 30),
        );
        assert_eq!(first, New_York.with_ymd_and_hms(2025, 3, 9, 3, 0, 0).unwrap());

        let after = step(&Repeat::Daily, &first, time(2, 30)).unwrap();
        assert_eq!(after, New_York.with_ymd_and_hms(2025, 3, 10, 2, 30, 0).unwrap());

        let weekly = Repeat::weekly(0).unwrap();
        let now = New_York.with_ymd_and_hms(2025, 3, 12, 0, 0, 0).unwrap();
        assert_eq!(
            catch_up(&weekly, &first, time(2, 30), &now).unwrap(),
            New_York.with_ymd_and_hms(2025, 3, 16, 2, 30, 0).unwrap()
        );
    }

    #[test]
    fn every_n_days_catch_up_advances_by_exactly_the_interval() {
        let repeat = Repeat::every_n_days(3).unwrap();
        let stale = utc(2025, 5, 1, 9, 0, 0);
        let first = step(&repeat, &stale, time(9, 0)).unwrap();
        let second = step(&repeat, &first, time(9, 0)).unwrap();
        assert_eq!(first - stale, Duration::days(3));
        assert_eq!(second - first, Duration::days(3));

        let now = utc(2025, 6, 2, 10, 0, 0);
        let caught_up = catch_up(&repeat, &stale, time(9, 0), &now).unwrap();
        assert_eq!(caught_up, utc(2025, 6, 3, 9, 0, 0));
        assert_eq!((caught_up - stale).num_days() % 3, 0);
    }

    #[test]
    fn weekly_catch_up_lands_on_next_occurrence() {
        let repeat = Repeat::weekly(1).unwrap();
        // Three weeks stale
        let stale = utc(2025, 5, 12, 9, 0, 0);
        let now = utc(2025, 6, 3, 12, 0, 0);
        assert_eq!(catch_up(&repeat, &stale, time(9, 0), &now).unwrap(), utc(2025, 6, 9, 9, 0, 0));
    }

    #[test]
    fn monthly_catch_up_reanchors_after_short_month() {
        let repeat = Repeat::monthly(31).unwrap();
        let jan = utc(2025, 1, 31, 9, 0, 0);
        let feb = step(&repeat, &jan, time(9, 0)).unwrap();
        assert_eq!(feb, utc(2025, 2, 28, 9, 0, 0));
        assert_eq!(step(&repeat, &feb, time(9, 0)).unwrap(), utc(2025, 3, 31, 9, 0, 0));
    }

    #[test]
    fn yearly_catch_up_reanchors_leap_day() {
        let repeat = Repeat::yearly(29, 2).unwrap();
        let leap = utc(2024, 2, 29, 9, 0, 0);
        let common = step(&repeat, &leap, time(9, 0)).unwrap();
        assert_eq!(common, utc(2025, 2, 28, 9, 0, 0));
        let now = utc(2027, 6, 1, 0, 0, 0);
        assert_eq!(catch_up(&repeat, &common, time(9, 0), &now).unwrap(), utc(2028, 2, 29, 9, 0, 0));
    }

    #[test]
    fn catch_up_always_moves_forward() {
        let now = utc(2025, 6, 2, 9, 0, 0);
        assert_eq!(
            catch_up(&Repeat::Daily, &now, time(9, 0), &now).unwrap(),
            utc(2025, 6, 3, 9, 0, 0)
        );
        assert!(catch_up(&Repeat::None, &now, time(9, 0), &now).is_none());
    }
}
