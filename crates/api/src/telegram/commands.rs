use crate::{
    chat::chat_timezone,
    reminder::{
        delete_reminder::{self, DeleteReminderUseCase},
        edit_reminder::{self, EditReminderUseCase},
        list_reminders::{self, ListRemindersUseCase},
        set_reminder_paused::{self, SetReminderPausedUseCase},
    },
    shared::{keyboards, texts, usecase::execute},
};
use chrono::NaiveTime;
use dory_reminder_domain::input::parse_time;
use dory_reminder_infra::{telegram::OutgoingMessage, DoryContext};
use tracing::error;

pub async fn start(ctx: &DoryContext, chat_id: i64) -> Vec<OutgoingMessage> {
    match chat_timezone(ctx, chat_id).await {
        Ok(Some(_)) => vec![OutgoingMessage::with_keyboard(
            texts::WELCOME,
            keyboards::main_menu(),
        )],
        Ok(None) => vec![OutgoingMessage::text(texts::WELCOME_NO_TZ)],
        Err(e) => {
            error!(chat_id, "Failed to load chat: {:?}", e);
            vec![OutgoingMessage::text(texts::GENERIC_FAILURE)]
        }
    }
}

pub fn help() -> Vec<OutgoingMessage> {
    vec![OutgoingMessage::with_keyboard(texts::HELP, keyboards::main_menu())]
}

pub async fn list(ctx: &DoryContext, chat_id: i64, page: usize) -> Vec<OutgoingMessage> {
    let page = match execute(ListRemindersUseCase { chat_id, page }, ctx).await {
        Ok(page) => page,
        Err(list_reminders::UseCaseError::StorageError) => {
            return vec![OutgoingMessage::text(texts::GENERIC_FAILURE)]
        }
    };
    if page.entries.is_empty() {
        return vec![OutgoingMessage::text(texts::NO_REMINDERS)];
    }

    let mut lines = vec![texts::list_header(page.page, page.total_pages)];
    lines.extend(
        page.entries
            .iter()
            .map(|(number, reminder)| texts::reminder_line(*number, reminder, &page.timezone)),
    );
    let text = lines.join("\n\n");

    match keyboards::page_navigation(page.page, page.total_pages) {
        Some(keyboard) => vec![OutgoingMessage::with_keyboard(text, keyboard)],
        None => vec![OutgoingMessage::text(text)],
    }
}

/// First argument as a reminder number, zero is never valid
fn parse_number(args: &str) -> Option<usize> {
    args.split_whitespace()
        .next()?
        .parse::<usize>()
        .ok()
        .filter(|number| *number > 0)
}

#[derive(Debug, PartialEq)]
struct EditArgs {
    number: usize,
    time: Option<NaiveTime>,
    text: String,
}

/// `<n> [HH:MM] <text>`
fn parse_edit_args(args: &str) -> Option<EditArgs> {
    let (number, rest) = split_first(args.trim())?;
    let number = parse_number(number)?;

    let (time, text) = match split_first(rest) {
        Some((first, tail)) => match parse_time(first) {
            Some(time) => (Some(time), tail),
            None => (None, rest),
        },
        None => (None, rest),
    };
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(EditArgs {
        number,
        time,
        text: text.to_string(),
    })
}

fn split_first(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], s[i..].trim_start())),
        None => Some((s, "")),
    }
}

pub async fn edit(ctx: &DoryContext, chat_id: i64, args: &str) -> Vec<OutgoingMessage> {
    let args = match parse_edit_args(args) {
        Some(args) => args,
        None => return vec![OutgoingMessage::text(texts::EDIT_USAGE)],
    };
    let usecase = EditReminderUseCase {
        chat_id,
        number: args.number,
        time: args.time,
        text: args.text,
    };

    let reply = match execute(usecase, ctx).await {
        Ok(reminder) => {
            let tz = chat_timezone(ctx, chat_id)
                .await
                .ok()
                .flatten()
                .unwrap_or(chrono_tz::UTC);
            texts::reminder_edited(args.number, &reminder, &tz)
        }
        Err(edit_reminder::UseCaseError::NotFound(_)) => texts::NO_SUCH_REMINDER.into(),
        Err(edit_reminder::UseCaseError::EmptyText) => texts::EDIT_USAGE.into(),
        Err(edit_reminder::UseCaseError::TooLong) => texts::TEXT_TOO_LONG.into(),
        Err(edit_reminder::UseCaseError::StorageError) => texts::GENERIC_FAILURE.into(),
    };
    vec![OutgoingMessage::text(reply)]
}

pub async fn delete(ctx: &DoryContext, chat_id: i64, args: &str) -> Vec<OutgoingMessage> {
    let number = match parse_number(args) {
        Some(number) => number,
        None => return vec![OutgoingMessage::text(texts::WRONG_NUMBER)],
    };

    let reply = match execute(DeleteReminderUseCase { chat_id, number }, ctx).await {
        Ok(_) => texts::reminder_deleted(number),
        Err(delete_reminder::UseCaseError::NotFound(_)) => texts::NO_SUCH_REMINDER.into(),
        Err(delete_reminder::UseCaseError::StorageError) => texts::GENERIC_FAILURE.into(),
    };
    vec![OutgoingMessage::text(reply)]
}

pub async fn set_paused(
    ctx: &DoryContext,
    chat_id: i64,
    args: &str,
    paused: bool,
) -> Vec<OutgoingMessage> {
    let number = match parse_number(args) {
        Some(number) => number,
        None => return vec![OutgoingMessage::text(texts::WRONG_NUMBER)],
    };

    let usecase = SetReminderPausedUseCase {
        chat_id,
        number,
        paused,
    };
    let reply = match execute(usecase, ctx).await {
        Ok(_) => texts::reminder_paused(number, paused),
        Err(set_reminder_paused::UseCaseError::NotFound(_)) => texts::NO_SUCH_REMINDER.into(),
        Err(set_reminder_paused::UseCaseError::StorageError) => texts::GENERIC_FAILURE.into(),
    };
    vec![OutgoingMessage::text(reply)]
}
