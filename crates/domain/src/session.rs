use chrono::{NaiveDate, NaiveTime};
use std::str::FromStr;
use thiserror::Error;

/// Which input a `Session` is currently waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    None,
    Type,
    Time,
    Text,
    Interval,
    Date,
    Confirm,
    Timezone,
}

/// The kind of reminder picked from the menu. Decoded once when the user
/// selects it and carried through the rest of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    Today,
    Tomorrow,
    Daily,
    Weekly,
    EveryNDays,
    Monthly,
    Yearly,
    OnDate,
}

impl ReminderKind {
    pub fn token(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::Daily => "everyday",
            Self::Weekly => "week",
            Self::EveryNDays => "ndays",
            Self::Monthly => "month",
            Self::Yearly => "year",
            Self::OnDate => "date",
        }
    }

    pub fn all() -> [ReminderKind; 8] {
        [
            Self::Today,
            Self::Tomorrow,
            Self::Daily,
            Self::Weekly,
            Self::EveryNDays,
            Self::Monthly,
            Self::Yearly,
            Self::OnDate,
        ]
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown reminder kind: `{0}`")]
pub struct InvalidReminderKindError(String);

impl FromStr for ReminderKind {
    type Err = InvalidReminderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|kind| kind.token() == s)
            .ok_or_else(|| InvalidReminderKindError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionDate {
    /// `DD.MM` of a yearly reminder
    DayMonth { day: u32, month: u32 },
    /// `DD.MM.YYYY`, the start of an every-N-days cycle or a pinned date
    Full(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

/// In-progress wizard conversation of one user in one chat. Fields are
/// filled turn by turn until the reminder can be built.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub chat_id: i64,
    pub user_id: i64,
    pub step: WizardStep,
    pub kind: Option<ReminderKind>,
    pub time: Option<NaiveTime>,
    pub date: Option<SessionDate>,
    /// Weekday index for weekly reminders, day of month for monthly ones
    /// and the cycle length for every-N-days ones
    pub interval: Option<u32>,
    pub text: Option<String>,
}

impl Session {
    /// A fresh reminder wizard waiting for the kind to be selected
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self {
            chat_id,
            user_id,
            step: WizardStep::Type,
            kind: None,
            time: None,
            date: None,
            interval: None,
            text: None,
        }
    }

    /// A session waiting for a timezone name
    pub fn for_timezone(chat_id: i64, user_id: i64) -> Self {
        Self {
            step: WizardStep::Timezone,
            ..Self::new(chat_id, user_id)
        }
    }

    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.chat_id, self.user_id)
    }
}
