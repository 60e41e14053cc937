use crate::{
    chat::set_timezone::{SetTimezoneUseCase, UseCaseError},
    shared::{keyboards, texts, usecase::execute},
};
use dory_reminder_domain::Session;
use dory_reminder_infra::{telegram::OutgoingMessage, DoryContext};
use tracing::info;

pub fn start(ctx: &DoryContext, chat_id: i64, user_id: i64) -> Vec<OutgoingMessage> {
    ctx.sessions.set(Session::for_timezone(chat_id, user_id));
    vec![OutgoingMessage::text(texts::SET_TIMEZONE_PROMPT)]
}

pub async fn submit_timezone(
    ctx: &DoryContext,
    session: Session,
    text: &str,
) -> Vec<OutgoingMessage> {
    let usecase = SetTimezoneUseCase {
        chat_id: session.chat_id,
        timezone: text.trim().to_string(),
    };

    match execute(usecase, ctx).await {
        Ok(res) => {
            ctx.sessions.delete(&session.key());
            info!(chat_id = session.chat_id, timezone = res.timezone.name(), "Timezone configured");
            let mut replies = vec![OutgoingMessage::text(texts::timezone_set(&res.timezone))];
            if res.first_time {
                replies.push(OutgoingMessage::with_keyboard(
                    texts::HELP_MAIN_MENU,
                    keyboards::main_menu(),
                ));
            }
            replies
        }
        Err(UseCaseError::InvalidTimezone(_)) => vec![OutgoingMessage::text(texts::UNKNOWN_TIMEZONE)],
        Err(UseCaseError::StorageError) => vec![OutgoingMessage::text(texts::GENERIC_FAILURE)],
    }
}
