pub mod register_chat;
pub mod set_timezone;

use chrono_tz::Tz;
use dory_reminder_infra::DoryContext;

/// The owner timezone of the chat, `None` until it has been configured
pub async fn chat_timezone(ctx: &DoryContext, chat_id: i64) -> anyhow::Result<Option<Tz>> {
    let chat = ctx.repos.chats.find(chat_id).await?;
    Ok(chat.and_then(|chat| chat.timezone))
}
