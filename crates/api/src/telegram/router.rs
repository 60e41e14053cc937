use super::commands;
use crate::{
    chat::register_chat::RegisterChatUseCase,
    shared::{texts, usecase::execute},
    wizard::{self, add_reminder, timezone},
};
use dory_reminder_domain::{input::strip_mention, ChatKind, ReminderKind};
use dory_reminder_infra::{
    telegram::{Message, OutgoingMessage, Update},
    DoryContext,
};
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Add,
    List,
    Edit(String),
    Delete(String),
    Pause(String),
    Resume(String),
    Timezone,
}

/// Everything a chat member can ask the bot to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Command(Command),
    SelectKind(ReminderKind),
    Weekday(u32),
    ListPage(usize),
    HelpAdd,
    HelpList,
    HelpManage,
    /// Free text with the bot mention already removed
    Text(String),
}

/// A decoded update together with the chat it came from
#[derive(Debug, Clone)]
pub struct Incoming {
    pub chat_id: i64,
    pub chat_kind: ChatKind,
    pub chat_name: String,
    pub chat_username: Option<String>,
    pub user_id: i64,
    pub action: Option<Action>,
    /// Set when the update is a pressed inline button
    pub callback_id: Option<String>,
}

fn decode_command(text: &str, bot_name: &str) -> Option<Command> {
    let text = text.trim();
    let (head, args) = match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim()),
        None => (text, ""),
    };
    let name = head.strip_prefix('/')?;
    let name = match name.split_once('@') {
        Some((name, target)) if target.eq_ignore_ascii_case(bot_name) => name,
        // Addressed to another bot in the same group
        Some(_) => return None,
        None => name,
    };

    let command = match name {
        "start" => Command::Start,
        "help" => Command::Help,
        "add" => Command::Add,
        "list" => Command::List,
        "edit" => Command::Edit(args.to_string()),
        "delete" => Command::Delete(args.to_string()),
        "pause" => Command::Pause(args.to_string()),
        "resume" => Command::Resume(args.to_string()),
        "timezone" => Command::Timezone,
        _ => return None,
    };
    Some(command)
}

pub fn decode_callback(data: &str) -> Option<Action> {
    let data = data.trim();
    if let Some(token) = data.strip_prefix("add_") {
        return ReminderKind::from_str(token).ok().map(Action::SelectKind);
    }
    if let Some(index) = data.strip_prefix("weekday_") {
        return index.parse().ok().map(Action::Weekday);
    }
    if let Some(page) = data.strip_prefix("rem_page_") {
        return page.parse().ok().map(Action::ListPage);
    }
    match data {
        "help_add" => Some(Action::HelpAdd),
        "help_list" => Some(Action::HelpList),
        "help_manage" => Some(Action::HelpManage),
        _ => None,
    }
}

fn replies_to_bot(message: &Message, bot_name: &str) -> bool {
    message
        .reply_to_message
        .as_ref()
        .and_then(|replied| replied.from.as_ref())
        .map(|author| {
            author.is_bot
                && author
                    .username
                    .as_deref()
                    .map_or(true, |name| name.eq_ignore_ascii_case(bot_name))
        })
        .unwrap_or(false)
}

fn decode_message(message: &Message, kind: ChatKind, bot_name: &str) -> Option<Action> {
    let text = message.text.as_deref()?;
    if text.trim_start().starts_with('/') {
        return decode_command(text, bot_name).map(Action::Command);
    }

    // Group members talk to each other, only text aimed at the bot counts
    let mentioned = text.contains(&format!("@{}", bot_name));
    if kind.is_group() && !mentioned && !replies_to_bot(message, bot_name) {
        return None;
    }
    Some(Action::Text(strip_mention(text, bot_name)))
}

/// `None` for updates that carry nothing the bot reacts to at all
pub fn decode(update: &Update, bot_name: &str) -> Option<Incoming> {
    let (message, user_id, callback_id) = match (&update.message, &update.callback_query) {
        (Some(message), _) => (message, message.from.as_ref()?.id, None),
        (None, Some(query)) => (query.message.as_ref()?, query.from.id, Some(query.id.clone())),
        (None, None) => return None,
    };

    let chat_kind = match ChatKind::from_str(&message.chat.kind) {
        Ok(kind) => kind,
        Err(e) => {
            warn!(update_id = update.update_id, "Skipping update: {}", e);
            return None;
        }
    };

    let action = match &update.callback_query {
        Some(query) if update.message.is_none() => {
            query.data.as_deref().and_then(decode_callback)
        }
        _ => decode_message(message, chat_kind, bot_name),
    };

    Some(Incoming {
        chat_id: message.chat.id,
        chat_kind,
        chat_name: message.chat.display_name(),
        chat_username: message.chat.username.clone(),
        user_id,
        action,
        callback_id,
    })
}

/// Runs the handler of the action and returns the replies for the chat
pub async fn dispatch(ctx: &DoryContext, incoming: &Incoming) -> Vec<OutgoingMessage> {
    let chat_id = incoming.chat_id;
    let user_id = incoming.user_id;
    let action = match &incoming.action {
        Some(action) => action,
        None => return Vec::new(),
    };

    match action {
        Action::Command(Command::Start) => commands::start(ctx, chat_id).await,
        Action::Command(Command::Help) => commands::help(),
        Action::Command(Command::Add) | Action::HelpAdd => {
            add_reminder::start(ctx, chat_id, user_id).await
        }
        Action::Command(Command::List) => commands::list(ctx, chat_id, 0).await,
        Action::Command(Command::Edit(args)) => commands::edit(ctx, chat_id, args).await,
        Action::Command(Command::Delete(args)) => commands::delete(ctx, chat_id, args).await,
        Action::Command(Command::Pause(args)) => {
            commands::set_paused(ctx, chat_id, args, true).await
        }
        Action::Command(Command::Resume(args)) => {
            commands::set_paused(ctx, chat_id, args, false).await
        }
        Action::Command(Command::Timezone) => timezone::start(ctx, chat_id, user_id),
        Action::SelectKind(kind) => add_reminder::select_kind(ctx, chat_id, user_id, *kind).await,
        Action::Weekday(index) => add_reminder::select_weekday(ctx, chat_id, user_id, *index),
        Action::ListPage(page) => commands::list(ctx, chat_id, *page).await,
        Action::HelpList => vec![OutgoingMessage::text(texts::HELP_LIST)],
        Action::HelpManage => vec![OutgoingMessage::text(texts::HELP_MANAGE)],
        Action::Text(text) => wizard::handle_text(ctx, chat_id, user_id, text).await,
    }
}

/// Full handling of one inbound update: registers the chat, runs the
/// action and sends the replies. Failures are logged, never returned.
pub async fn handle_update(ctx: &DoryContext, update: &Update) {
    let incoming = match decode(update, &ctx.config.bot_name) {
        Some(incoming) => incoming,
        None => return,
    };

    let register = RegisterChatUseCase {
        chat_id: incoming.chat_id,
        kind: incoming.chat_kind,
        name: incoming.chat_name.clone(),
        username: incoming.chat_username.clone(),
    };
    let _ = execute(register, ctx).await;

    if let Some(action) = &incoming.action {
        info!(
            chat_id = incoming.chat_id,
            user_id = incoming.user_id,
            action = ?action,
            "Handling update"
        );
    }
    let replies = dispatch(ctx, &incoming).await;
    for reply in &replies {
        if let Err(e) = ctx.messenger.send(incoming.chat_id, reply).await {
            warn!(chat_id = incoming.chat_id, "Failed to send reply: {:?}", e);
        }
    }

    if let Some(callback_id) = &incoming.callback_id {
        if let Err(e) = ctx.messenger.answer_callback(callback_id).await {
            warn!(chat_id = incoming.chat_id, "Failed to answer callback: {:?}", e);
        }
    }
}
