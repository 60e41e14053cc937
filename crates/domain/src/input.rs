//! Parsing of the free-form text users type while talking to the bot.

use crate::date::parse_date;
use chrono::{NaiveDate, NaiveTime};

/// Parses `HH:MM` (24h clock, both parts zero padded)
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let (hours, minutes) = (&s[..2], &s[3..]);
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

/// An integer strictly greater than zero
pub fn parse_interval(s: &str) -> Option<u32> {
    match s.trim().parse::<i64>() {
        Ok(n) if n > 0 && n <= u32::MAX as i64 => Some(n as u32),
        _ => None,
    }
}

pub fn parse_day_of_month(s: &str) -> Option<u32> {
    parse_interval(s).filter(|day| *day <= 31)
}

const WEEKDAY_NAMES: [(&str, u32); 14] = [
    ("воскресенье", 0),
    ("понедельник", 1),
    ("вторник", 2),
    ("среда", 3),
    ("четверг", 4),
    ("пятница", 5),
    ("суббота", 6),
    ("sunday", 0),
    ("monday", 1),
    ("tuesday", 2),
    ("wednesday", 3),
    ("thursday", 4),
    ("friday", 5),
    ("saturday", 6),
];

/// Weekday name to its index where 0 is Sunday
pub fn parse_weekday(s: &str) -> Option<u32> {
    let name = s.trim().to_lowercase();
    WEEKDAY_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, index)| *index)
}

pub fn weekday_name(index: u32) -> &'static str {
    WEEKDAY_NAMES
        .iter()
        .skip(7)
        .find(|(_, i)| *i == index)
        .map(|(name, _)| *name)
        .unwrap_or("unknown")
}

/// Parses `DD.MM.YYYY HH:MM` given as exactly two whitespace separated tokens
pub fn parse_date_time(s: &str) -> Option<(NaiveDate, NaiveTime)> {
    let parts = s.split_whitespace().collect::<Vec<_>>();
    if parts.len() != 2 {
        return None;
    }

    Some((parse_date(parts[0])?, parse_time(parts[1])?))
}

/// Removes every `@bot_name` mention, then trims. Group chats need the
/// mention for the bot to see the message at all.
pub fn strip_mention(text: &str, bot_name: &str) -> String {
    if bot_name.is_empty() {
        return text.trim().to_string();
    }
    text.replace(&format!("@{}", bot_name), "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_times() {
        assert_eq!(parse_time("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_time("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_time("00:00"), NaiveTime::from_hms_opt(0, 0, 0));
    }

    #[test]
    fn rejects_invalid_times() {
        for s in ["9:00", "24:00", "12:60", "12-00", "ab:cd", "", "12:000", " 12:00"] {
            assert!(parse_time(s).is_none(), "{}", s);
        }
    }

    #[test]
    fn intervals_must_be_positive() {
        assert_eq!(parse_interval("3"), Some(3));
        assert_eq!(parse_interval("0"), None);
        assert_eq!(parse_interval("-2"), None);
        assert_eq!(parse_interval("two"), None);
        assert_eq!(parse_day_of_month("31"), Some(31));
        assert_eq!(parse_day_of_month("32"), None);
    }

    #[test]
    fn weekdays_ignore_case_and_whitespace() {
        assert_eq!(parse_weekday("понедельник"), Some(1));
        assert_eq!(parse_weekday("  Понедельник "), Some(1));
        assert_eq!(parse_weekday("ВОСКРЕСЕНЬЕ"), Some(0));
        assert_eq!(parse_weekday("Saturday"), Some(6));
        assert_eq!(parse_weekday("someday"), None);
        assert_eq!(weekday_name(1), "monday");
    }

    #[test]
    fn parses_date_with_time() {
        let (date, time) = parse_date_time("13.06.2025 15:30").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 13).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(15, 30, 0).unwrap());

        assert!(parse_date_time("13.06.2025").is_none());
        assert!(parse_date_time("13.06.2025 15:30 extra").is_none());
        assert!(parse_date_time("15:30 13.06.2025").is_none());
    }

    #[test]
    fn strips_bot_mention() {
        assert_eq!(strip_mention("09:00 @dory_bot", "dory_bot"), "09:00");
        assert_eq!(strip_mention("@dory_bot  take pill ", "dory_bot"), "take pill");
        assert_eq!(strip_mention(" plain ", "dory_bot"), "plain");
    }
}
