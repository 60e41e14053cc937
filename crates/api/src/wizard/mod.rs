//! Conversations that span several messages. Each handler loads the
//! sender's session, advances it and answers with the next question.

pub mod add_reminder;
pub mod timezone;

use dory_reminder_domain::{SessionKey, WizardStep};
use dory_reminder_infra::{telegram::OutgoingMessage, DoryContext};

/// Routes free text to whichever wizard the sender is in. Text from
/// users without a session is ignored.
pub async fn handle_text(
    ctx: &DoryContext,
    chat_id: i64,
    user_id: i64,
    text: &str,
) -> Vec<OutgoingMessage> {
    let session = match ctx.sessions.get(&SessionKey::new(chat_id, user_id)) {
        Some(session) => session,
        None => return Vec::new(),
    };

    match session.step {
        WizardStep::Timezone => timezone::submit_timezone(ctx, session, text).await,
        _ => add_reminder::submit(ctx, session, text).await,
    }
}
