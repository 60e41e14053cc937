use crate::{
    chat::chat_timezone,
    reminder::create_reminder::{CreateReminderUseCase, UseCaseError},
    shared::{keyboards, texts, usecase::execute},
};
use dory_reminder_domain::{
    wizard::{self, Prompt, Transition},
    ReminderKind, Session, SessionKey,
};
use dory_reminder_infra::{telegram::OutgoingMessage, DoryContext};
use tracing::{error, info};

fn prompt_message(prompt: Prompt) -> OutgoingMessage {
    match prompt {
        Prompt::ChooseKind => OutgoingMessage::with_keyboard(texts::CHOOSE_KIND, keyboards::kind_menu()),
        Prompt::EnterWeekday => {
            OutgoingMessage::with_keyboard(texts::prompt(prompt), keyboards::weekday_menu())
        }
        _ => OutgoingMessage::text(texts::prompt(prompt)),
    }
}

/// Reminders can only be scheduled once the chat has a timezone
async fn ensure_timezone(ctx: &DoryContext, chat_id: i64) -> Result<(), OutgoingMessage> {
    match chat_timezone(ctx, chat_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(OutgoingMessage::text(texts::TIMEZONE_MISSING)),
        Err(e) => {
            error!(chat_id, "Failed to load chat: {:?}", e);
            Err(OutgoingMessage::text(texts::GENERIC_FAILURE))
        }
    }
}

/// Opens a fresh wizard and shows the kind menu
pub async fn start(ctx: &DoryContext, chat_id: i64, user_id: i64) -> Vec<OutgoingMessage> {
    if let Err(reply) = ensure_timezone(ctx, chat_id).await {
        return vec![reply];
    }
    ctx.sessions.set(Session::new(chat_id, user_id));
    vec![prompt_message(Prompt::ChooseKind)]
}

pub async fn select_kind(
    ctx: &DoryContext,
    chat_id: i64,
    user_id: i64,
    kind: ReminderKind,
) -> Vec<OutgoingMessage> {
    if let Err(reply) = ensure_timezone(ctx, chat_id).await {
        return vec![reply];
    }
    let mut session = ctx
        .sessions
        .get(&SessionKey::new(chat_id, user_id))
        .unwrap_or_else(|| Session::new(chat_id, user_id));
    let prompt = wizard::select_kind(&mut session, kind);
    info!(chat_id, user_id, kind = kind.token(), "Reminder kind selected");
    ctx.sessions.set(session);
    vec![prompt_message(prompt)]
}

pub fn select_weekday(
    ctx: &DoryContext,
    chat_id: i64,
    user_id: i64,
    index: u32,
) -> Vec<OutgoingMessage> {
    let mut session = match ctx.sessions.get(&SessionKey::new(chat_id, user_id)) {
        Some(session) => session,
        None => return vec![OutgoingMessage::text(texts::UNKNOWN_WEEKDAY)],
    };
    match wizard::select_weekday(&mut session, index) {
        Some(prompt) => {
            ctx.sessions.set(session);
            vec![prompt_message(prompt)]
        }
        None => vec![OutgoingMessage::text(texts::UNKNOWN_WEEKDAY)],
    }
}

/// Applies one answer. Once the last answer arrives the session is
/// removed whether or not the reminder could be saved.
pub async fn submit(ctx: &DoryContext, mut session: Session, text: &str) -> Vec<OutgoingMessage> {
    let step = session.step;
    match wizard::submit(&mut session, text) {
        Transition::Advanced(prompt) => {
            info!(
                chat_id = session.chat_id,
                user_id = session.user_id,
                from = ?step,
                to = ?session.step,
                "Wizard advanced"
            );
            ctx.sessions.set(session);
            vec![prompt_message(prompt)]
        }
        Transition::Rejected(prompt) => vec![prompt_message(prompt)],
        Transition::Completed => {
            ctx.sessions.delete(&session.key());
            match execute(CreateReminderUseCase { session }, ctx).await {
                Ok(created) => vec![OutgoingMessage::text(texts::reminder_created(
                    &created.reminder,
                    &created.timezone,
                ))],
                Err(UseCaseError::TimezoneMissing) => vec![OutgoingMessage::text(texts::TIMEZONE_MISSING)],
                Err(_) => vec![OutgoingMessage::text(texts::CREATE_FAILED)],
            }
        }
        Transition::Ignored => Vec::new(),
    }
}
