//! Transition table of the reminder wizard.
//!
//! Every function here only mutates the given `Session`. Loading and
//! storing sessions, talking to the user and persisting the finished
//! reminder is left to the caller.

use crate::date::parse_day_month;
use crate::input::{
    parse_date_time, parse_day_of_month, parse_interval, parse_time, parse_weekday,
};
use crate::recurrence;
use crate::{
    date::parse_date, text_fits, weekday_from_index, InvalidReminderError, InvalidRepeatError, Reminder,
    ReminderKind, Repeat, Session, SessionDate, WizardStep,
};
use chrono::prelude::*;
use chrono_tz::Tz;
use thiserror::Error;

/// The question the user has to answer next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    ChooseKind,
    EnterTime,
    EnterText,
    /// The text was too long for a single message
    ShorterText,
    EnterWeekday,
    EnterDayOfMonth,
    EnterDayMonth,
    EnterStartDate,
    EnterInterval,
    EnterDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Input accepted, the session moved on and waits for the next answer
    Advanced(Prompt),
    /// Input rejected, the session is unchanged and the prompt is repeated
    Rejected(Prompt),
    /// All data collected, the reminder can be built
    Completed,
    /// The session is not collecting reminder data
    Ignored,
}

/// Starts over with the chosen kind and returns the first question for it
pub fn select_kind(session: &mut Session, kind: ReminderKind) -> Prompt {
    *session = Session::new(session.chat_id, session.user_id);
    session.kind = Some(kind);

    let (step, prompt) = match kind {
        ReminderKind::Weekly => (WizardStep::Interval, Prompt::EnterWeekday),
        ReminderKind::Monthly => (WizardStep::Interval, Prompt::EnterDayOfMonth),
        ReminderKind::Yearly => (WizardStep::Interval, Prompt::EnterDayMonth),
        ReminderKind::EveryNDays => (WizardStep::Date, Prompt::EnterStartDate),
        ReminderKind::OnDate => (WizardStep::Date, Prompt::EnterDateTime),
        ReminderKind::Today | ReminderKind::Tomorrow | ReminderKind::Daily => {
            (WizardStep::Time, Prompt::EnterTime)
        }
    };
    session.step = step;
    prompt
}

fn interval_prompt(kind: ReminderKind) -> Prompt {
    match kind {
        ReminderKind::Weekly => Prompt::EnterWeekday,
        ReminderKind::Monthly => Prompt::EnterDayOfMonth,
        ReminderKind::Yearly => Prompt::EnterDayMonth,
        _ => Prompt::EnterInterval,
    }
}

/// Feeds one text answer into the session. `input` should already have
/// the bot mention removed.
pub fn submit(session: &mut Session, input: &str) -> Transition {
    let input = input.trim();
    let kind = match (session.step, session.kind) {
        (WizardStep::Type, _) => return Transition::Rejected(Prompt::ChooseKind),
        (WizardStep::Interval | WizardStep::Date | WizardStep::Time | WizardStep::Text, Some(kind)) => {
            kind
        }
        _ => return Transition::Ignored,
    };

    match session.step {
        WizardStep::Interval => {
            let accepted = match kind {
                ReminderKind::Weekly => parse_weekday(input).map(|day| session.interval = Some(day)),
                ReminderKind::Monthly => {
                    parse_day_of_month(input).map(|day| session.interval = Some(day))
                }
                ReminderKind::Yearly => parse_day_month(input)
                    .map(|(day, month)| session.date = Some(SessionDate::DayMonth { day, month })),
                _ => parse_interval(input).map(|n| session.interval = Some(n)),
            };
            match accepted {
                Some(()) => {
                    session.step = WizardStep::Time;
                    Transition::Advanced(Prompt::EnterTime)
                }
                None => Transition::Rejected(interval_prompt(kind)),
            }
        }
        WizardStep::Date if kind == ReminderKind::OnDate => match parse_date_time(input) {
            Some((date, time)) => {
                session.date = Some(SessionDate::Full(date));
                session.time = Some(time);
                session.step = WizardStep::Text;
                Transition::Advanced(Prompt::EnterText)
            }
            None => Transition::Rejected(Prompt::EnterDateTime),
        },
        WizardStep::Date => match parse_date(input) {
            Some(date) => {
                session.date = Some(SessionDate::Full(date));
                session.step = WizardStep::Interval;
                Transition::Advanced(Prompt::EnterInterval)
            }
            None => Transition::Rejected(Prompt::EnterStartDate),
        },
        WizardStep::Time => match parse_time(input) {
            Some(time) => {
                session.time = Some(time);
                session.step = WizardStep::Text;
                Transition::Advanced(Prompt::EnterText)
            }
            None => Transition::Rejected(Prompt::EnterTime),
        },
        WizardStep::Text => {
            if input.is_empty() {
                return Transition::Rejected(Prompt::EnterText);
            }
            if !text_fits(input) {
                return Transition::Rejected(Prompt::ShorterText);
            }
            session.text = Some(input.to_string());
            session.step = WizardStep::Confirm;
            Transition::Completed
        }
        _ => Transition::Ignored,
    }
}

/// Weekday picked with a button, `index` 0 is Sunday. Only valid while a
/// weekly reminder waits for its weekday, otherwise `None` is returned
/// and the session is left alone.
pub fn select_weekday(session: &mut Session, index: u32) -> Option<Prompt> {
    let waiting_for_weekday =
        session.step == WizardStep::Interval && session.kind == Some(ReminderKind::Weekly);
    if !waiting_for_weekday || weekday_from_index(index).is_none() {
        return None;
    }
    session.interval = Some(index);
    session.step = WizardStep::Time;
    Some(Prompt::EnterTime)
}

#[derive(Error, Debug, PartialEq)]
pub enum IncompleteSessionError {
    #[error("Session has not selected a reminder kind")]
    MissingKind,
    #[error("Session is missing the {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    InvalidRepeat(#[from] InvalidRepeatError),
    #[error(transparent)]
    InvalidReminder(#[from] InvalidReminderError),
}

/// Turns a completed session into a `Reminder` whose first delivery is
/// computed in the chat timezone `tz`
pub fn build_reminder(
    session: &Session,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Result<Reminder, IncompleteSessionError> {
    use IncompleteSessionError::MissingField;

    let kind = session.kind.ok_or(IncompleteSessionError::MissingKind)?;
    let text = session.text.clone().ok_or(MissingField("text"))?;
    let time = session.time.ok_or(MissingField("time"))?;
    let local_now = now.with_timezone(tz);

    let (next_time, repeat) = match kind {
        ReminderKind::Today => (recurrence::next_today(&local_now, time), Repeat::None),
        ReminderKind::Tomorrow => (recurrence::next_tomorrow(&local_now, time), Repeat::None),
        ReminderKind::Daily => (recurrence::next_daily(&local_now, time), Repeat::Daily),
        ReminderKind::Weekly => {
            let index = session.interval.ok_or(MissingField("weekday"))?;
            let repeat = Repeat::weekly(index)?;
            let weekday = weekday_from_index(index).ok_or(InvalidRepeatError::Weekday(index))?;
            (recurrence::next_weekly(&local_now, time, weekday), repeat)
        }
        ReminderKind::Monthly => {
            let day = session.interval.ok_or(MissingField("day of month"))?;
            let repeat = Repeat::monthly(day)?;
            (recurrence::next_monthly(&local_now, time, day), repeat)
        }
        ReminderKind::Yearly => match session.date {
            Some(SessionDate::DayMonth { day, month }) => {
                let repeat = Repeat::yearly(day, month)?;
                (recurrence::next_yearly(&local_now, time, day, month), repeat)
            }
            _ => return Err(MissingField("day and month")),
        },
        ReminderKind::EveryNDays => {
            let start = match session.date {
                Some(SessionDate::Full(date)) => date,
                _ => return Err(MissingField("start date")),
            };
            let interval = session.interval.ok_or(MissingField("interval"))?;
            let repeat = Repeat::every_n_days(interval)?;
            (
                recurrence::next_every_n_days(&local_now, start, time, interval),
                repeat,
            )
        }
        ReminderKind::OnDate => match session.date {
            Some(SessionDate::Full(date)) => (recurrence::on_date(tz, date, time), Repeat::None),
            _ => return Err(MissingField("date")),
        },
    };

    let reminder = Reminder::new(
        session.chat_id,
        session.user_id,
        text,
        next_time.with_timezone(&Utc),
        repeat,
        now,
    )
    .with_time_of_day(time);
    reminder.validate()?;
    Ok(reminder)
}
