use chrono::prelude::*;

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Caps `day` at the length of the given month, e.g. the 31st of
/// April becomes the 30th.
pub fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    day.clamp(1, get_month_length(year, month))
}

/// The calendar date for `day` in the given month with the day clamped
/// to the last day of that month.
pub fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, clamp_day(year, month, day))
        .expect("Clamped day of a valid month to always be a valid date")
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parses `DD.MM`, e.g. `13.06`. The day must exist in at least one year
/// so `29.02` is accepted while `30.02` is not.
pub fn parse_day_month(datestr: &str) -> Option<(u32, u32)> {
    let parts = datestr.split('.').collect::<Vec<_>>();
    if parts.len() != 2 || parts.iter().any(|p| p.len() != 2 || !is_digits(p)) {
        return None;
    }
    let day = parts[0].parse::<u32>().ok()?;
    let month = parts[1].parse::<u32>().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    // 2000 is a leap year, so February allows the 29th
    if day < 1 || day > get_month_length(2000, month) {
        return None;
    }

    Some((day, month))
}

/// Parses `DD.MM.YYYY`, e.g. `13.06.2025`
pub fn parse_date(datestr: &str) -> Option<NaiveDate> {
    let parts = datestr.split('.').collect::<Vec<_>>();
    if parts.len() != 3 || parts[0].len() != 2 || parts[1].len() != 2 || parts[2].len() != 4 {
        return None;
    }
    if !parts.iter().all(|p| is_digits(p)) {
        return None;
    }
    let day = parts[0].parse().ok()?;
    let month = parts[1].parse().ok()?;
    let year = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_date_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%d.%m.%Y %H:%M").to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_accepts_valid_dates() {
        let valid_dates = vec!["01.01.2018", "31.12.2025", "12.01.2020", "29.02.2020"];

        for date in &valid_dates {
            assert!(parse_date(date).is_some(), "{}", date);
        }
    }

    #[test]
    fn it_rejects_invalid_dates() {
        let invalid_dates = vec![
            "1.1.2018",
            "32.01.2020",
            "30.02.2020",
            "29.02.2021",
            "00.01.2020",
            "01.13.2020",
            "01.01.20",
            "aa.01.2020",
            "01-01-2020",
        ];

        for date in &invalid_dates {
            assert!(parse_date(date).is_none(), "{}", date);
        }
    }

    #[test]
    fn it_parses_day_month() {
        assert_eq!(parse_day_month("13.06"), Some((13, 6)));
        assert_eq!(parse_day_month("29.02"), Some((29, 2)));
        assert_eq!(parse_day_month("30.02"), None);
        assert_eq!(parse_day_month("31.04"), None);
        assert_eq!(parse_day_month("1.06"), None);
        assert_eq!(parse_day_month("13.6"), None);
        assert_eq!(parse_day_month("13.06.2025"), None);
    }

    #[test]
    fn it_clamps_days_to_month_length() {
        assert_eq!(clamp_day(2025, 2, 31), 28);
        assert_eq!(clamp_day(2024, 2, 31), 29);
        assert_eq!(clamp_day(2025, 4, 31), 30);
        assert_eq!(clamp_day(2025, 1, 31), 31);
        assert_eq!(
            clamped_date(2025, 2, 29),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }

    #[test]
    fn it_wraps_to_next_year() {
        assert_eq!(next_month(2025, 12), (2026, 1));
        assert_eq!(next_month(2025, 3), (2025, 4));
    }
}
