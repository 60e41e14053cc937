use crate::{recurrence, shared::entity::Entity};
use chrono::prelude::*;
use chrono_tz::Tz;
use thiserror::Error;

/// The recurrence policy of a `Reminder` without its parameters.
/// The discriminants are the persisted codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatKind {
    None = 0,
    Daily = 1,
    Weekly = 2,
    Monthly = 3,
    EveryNDays = 4,
    Yearly = 5,
}

impl RepeatKind {
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn from_code(code: i16) -> Result<Self, InvalidRepeatError> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Daily),
            2 => Ok(Self::Weekly),
            3 => Ok(Self::Monthly),
            4 => Ok(Self::EveryNDays),
            5 => Ok(Self::Yearly),
            _ => Err(InvalidRepeatError::UnknownKind(code)),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidRepeatError {
    #[error("Unknown repeat kind code: {0}")]
    UnknownKind(i16),
    #[error("Weekday index must be within 0..=6, got: {0}")]
    Weekday(u32),
    #[error("Day of month must be within 1..=31, got: {0}")]
    DayOfMonth(u32),
    #[error("Interval in days must be positive")]
    Interval,
    #[error("Invalid yearly date: {0}.{1}")]
    YearlyDate(u32, u32),
    #[error("Malformed repeat parameter: `{0}`")]
    MalformedParam(String),
}

/// How a `Reminder` recurs, together with the data each policy needs.
/// The constructors keep the parameters consistent with the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    None,
    Daily,
    Weekly { weekday: Weekday },
    Monthly { day: u32 },
    EveryNDays { interval: u32 },
    Yearly { day: u32, month: u32 },
}

/// 0 is Sunday, 6 is Saturday
pub fn weekday_from_index(index: u32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

impl Repeat {
    pub fn weekly(weekday_index: u32) -> Result<Self, InvalidRepeatError> {
        weekday_from_index(weekday_index)
            .map(|weekday| Self::Weekly { weekday })
            .ok_or(InvalidRepeatError::Weekday(weekday_index))
    }

    pub fn monthly(day: u32) -> Result<Self, InvalidRepeatError> {
        if !(1..=31).contains(&day) {
            return Err(InvalidRepeatError::DayOfMonth(day));
        }
        Ok(Self::Monthly { day })
    }

    pub fn every_n_days(interval: u32) -> Result<Self, InvalidRepeatError> {
        if interval == 0 {
            return Err(InvalidRepeatError::Interval);
        }
        Ok(Self::EveryNDays { interval })
    }

    pub fn yearly(day: u32, month: u32) -> Result<Self, InvalidRepeatError> {
        if !(1..=12).contains(&month) || day < 1 || day > crate::date::get_month_length(2000, month)
        {
            return Err(InvalidRepeatError::YearlyDate(day, month));
        }
        Ok(Self::Yearly { day, month })
    }

    pub fn kind(&self) -> RepeatKind {
        match self {
            Self::None => RepeatKind::None,
            Self::Daily => RepeatKind::Daily,
            Self::Weekly { .. } => RepeatKind::Weekly,
            Self::Monthly { .. } => RepeatKind::Monthly,
            Self::EveryNDays { .. } => RepeatKind::EveryNDays,
            Self::Yearly { .. } => RepeatKind::Yearly,
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// The auxiliary integers of this policy in their persisted order
    pub fn params(&self) -> Vec<u32> {
        match self {
            Self::None | Self::Daily => Vec::new(),
            Self::Weekly { weekday } => vec![weekday.num_days_from_sunday()],
            Self::Monthly { day } => vec![*day],
            Self::EveryNDays { interval } => vec![*interval],
            Self::Yearly { day, month } => vec![*day, *month],
        }
    }

    /// Comma joined params, empty when the policy has none
    pub fn encode_params(&self) -> String {
        self.params()
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn decode(kind: RepeatKind, params: &str) -> Result<Self, InvalidRepeatError> {
        let values = params
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| InvalidRepeatError::MalformedParam(params.to_string()))?;

        match (kind, values.as_slice()) {
            (RepeatKind::None, []) => Ok(Self::None),
            (RepeatKind::Daily, []) => Ok(Self::Daily),
            (RepeatKind::Weekly, [weekday]) => Self::weekly(*weekday),
            (RepeatKind::Monthly, [day]) => Self::monthly(*day),
            (RepeatKind::EveryNDays, [interval]) => Self::every_n_days(*interval),
            (RepeatKind::Yearly, [day, month]) => Self::yearly(*day, *month),
            _ => Err(InvalidRepeatError::MalformedParam(params.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidReminderError {
    #[error("Reminder text cannot be empty")]
    EmptyText,
    #[error("Reminder text is longer than {} characters", MAX_TEXT_LEN)]
    TooLong,
    #[error("Reminder must belong to a chat")]
    MissingChat,
}

/// Longest reminder text accepted, in characters. Leaves room for the
/// delivery prefix within a single Telegram message.
pub const MAX_TEXT_LEN: usize = 4000;

/// Whether `text` fits in a single delivered message
pub fn text_fits(text: &str) -> bool {
    text.chars().count() <= MAX_TEXT_LEN
}

/// A message to deliver to a chat at `next_time`, possibly recurring.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    /// Assigned by storage, zero until the `Reminder` has been persisted
    pub id: i64,
    /// The chat which owns the `Reminder` and receives it
    pub chat_id: i64,
    /// The user who created it
    pub user_id: i64,
    pub text: String,
    /// Next delivery instant
    pub next_time: DateTime<Utc>,
    pub repeat: Repeat,
    /// Wall clock time recurring occurrences return to, `None` uses the
    /// time of `next_time`
    pub time_of_day: Option<NaiveTime>,
    /// Paused reminders are kept but never delivered
    pub paused: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Reminder {
    pub fn new(
        chat_id: i64,
        user_id: i64,
        text: String,
        next_time: DateTime<Utc>,
        repeat: Repeat,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            chat_id,
            user_id,
            text,
            next_time,
            repeat,
            time_of_day: None,
            paused: false,
            created: now,
            updated: now,
        }
    }

    pub fn with_time_of_day(mut self, time: NaiveTime) -> Self {
        self.time_of_day = Some(time);
        self
    }

    pub fn validate(&self) -> Result<(), InvalidReminderError> {
        if self.text.trim().is_empty() {
            return Err(InvalidReminderError::EmptyText);
        }
        if !text_fits(&self.text) {
            return Err(InvalidReminderError::TooLong);
        }
        if self.chat_id == 0 {
            return Err(InvalidReminderError::MissingChat);
        }
        Ok(())
    }

    pub fn is_due(&self, now: &DateTime<Utc>) -> bool {
        !self.paused && self.next_time <= *now
    }

    /// Moves `next_time` to the first occurrence strictly after `now`
    /// as seen from the owner's timezone. Missed occurrences are skipped
    /// rather than replayed. Returns `false` for one-shot reminders,
    /// which have no next occurrence.
    pub fn reschedule(&mut self, tz: &Tz, now: DateTime<Utc>) -> bool {
        let scheduled = self.next_time.with_timezone(tz);
        let now_local = now.with_timezone(tz);
        let time = self.time_of_day.unwrap_or_else(|| scheduled.time());
        match recurrence::catch_up(&self.repeat, &scheduled, time, &now_local) {
            Some(next) => {
                self.next_time = next.with_timezone(&Utc);
                self.updated = now;
                true
            }
            None => false,
        }
    }
}

impl Entity<i64> for Reminder {
    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Moscow;

    #[test]
    fn params_roundtrip_through_storage_encoding() {
        let cases = vec![
            (Repeat::None, ""),
            (Repeat::Daily, ""),
            (Repeat::weekly(1).unwrap(), "1"),
            (Repeat::weekly(0).unwrap(), "0"),
            (Repeat::monthly(31).unwrap(), "31"),
            (Repeat::every_n_days(3).unwrap(), "3"),
            (Repeat::yearly(13, 6).unwrap(), "13,6"),
        ];
        for (repeat, encoded) in cases {
            assert_eq!(repeat.encode_params(), encoded);
            assert_eq!(Repeat::decode(repeat.kind(), encoded), Ok(repeat));
            assert_eq!(RepeatKind::from_code(repeat.kind().code()), Ok(repeat.kind()));
        }
    }

    #[test]
    fn rejects_params_inconsistent_with_kind() {
        assert!(Repeat::decode(RepeatKind::Weekly, "").is_err());
        assert!(Repeat::decode(RepeatKind::Weekly, "7").is_err());
        assert!(Repeat::decode(RepeatKind::Monthly, "0").is_err());
        assert!(Repeat::decode(RepeatKind::Monthly, "32").is_err());
        assert!(Repeat::decode(RepeatKind::EveryNDays, "0").is_err());
        assert!(Repeat::decode(RepeatKind::Yearly, "13").is_err());
        assert!(Repeat::decode(RepeatKind::Yearly, "30,2").is_err());
        assert!(Repeat::decode(RepeatKind::Daily, "1").is_err());
        assert!(Repeat::decode(RepeatKind::None, "x").is_err());
        assert_eq!(
            RepeatKind::from_code(9),
            Err(InvalidRepeatError::UnknownKind(9))
        );
    }

    #[test]
    fn validates_text_and_owner() {
        let now = Utc::now();
        let mut reminder = Reminder::new(1, 2, "take pill".into(), now, Repeat::Daily, now);
        assert!(reminder.validate().is_ok());
        reminder.text = "  ".into();
        assert_eq!(reminder.validate(), Err(InvalidReminderError::EmptyText));
        reminder.text = "z".repeat(MAX_TEXT_LEN + 1);
        assert_eq!(reminder.validate(), Err(InvalidReminderError::TooLong));
        // Counted in characters, not bytes
        reminder.text = "я".repeat(MAX_TEXT_LEN);
        assert!(reminder.validate().is_ok());
        reminder.text = "ok".into();
        reminder.chat_id = 0;
        assert_eq!(reminder.validate(), Err(InvalidReminderError::MissingChat));
    }

    #[test]
    fn paused_reminders_are_never_due() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
        let mut reminder = Reminder::new(1, 2, "x".into(), now, Repeat::None, now);
        assert!(reminder.is_due(&now));
        reminder.paused = true;
        assert!(!reminder.is_due(&now));
    }

    #[test]
    fn reschedule_keeps_local_wall_clock() {
        // 06:00 UTC is 09:00 in Moscow
        let next = Utc.with_ymd_and_hms(2025, 6, 2, 6, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 6, 0, 20).unwrap();
        let mut reminder = Reminder::new(1, 2, "x".into(), next, Repeat::Daily, next);

        assert!(reminder.reschedule(&Moscow, now));
        assert_eq!(
            reminder.next_time,
            Utc.with_ymd_and_hms(2025, 6, 3, 6, 0, 0).unwrap()
        );
        assert_eq!(reminder.updated, now);

        let mut once = Reminder::new(1, 2, "x".into(), next, Repeat::None, next);
        assert!(!once.reschedule(&Moscow, now));
        assert_eq!(once.next_time, next);
    }

    #[test]
    fn reschedule_returns_to_configured_time_after_dst_gap() {
        use chrono_tz::America::New_York;
        // 02:30 does not exist on 2025-03-09 in New York, so it fired at 03:00 EDT
        let fired = New_York
            .with_ymd_and_hms(2025, 3, 9, 3, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let now = fired + chrono::Duration::seconds(10);
        let mut reminder = Reminder::new(1, 2, "x".into(), fired, Repeat::Daily, fired)
            .with_time_of_day(NaiveTime::from_hms_opt(2, 30, 0).unwrap());

        assert!(reminder.reschedule(&New_York, now));
        assert_eq!(
            reminder.next_time,
            New_York
                .with_ymd_and_hms(2025, 3, 10, 2, 30, 0)
                .unwrap()
                .with_timezone(&Utc)
        );
    }
}
