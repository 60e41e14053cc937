use crate::shared::usecase::UseCase;
use chrono_tz::Tz;
use dory_reminder_domain::{Chat, ChatKind};
use dory_reminder_infra::DoryContext;

#[derive(Debug)]
pub struct SetTimezoneUseCase {
    pub chat_id: i64,
    /// IANA name as typed by the user
    pub timezone: String,
}

#[derive(Debug)]
pub struct SetTimezoneResponse {
    pub timezone: Tz,
    /// Whether the chat had no timezone before
    pub first_time: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidTimezone(String),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetTimezoneUseCase {
    type Response = SetTimezoneResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "SetTimezone";

    async fn execute(&mut self, ctx: &DoryContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        // Unknown chats are registered by the next update they send
        let mut chat = ctx
            .repos
            .chats
            .find(self.chat_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .unwrap_or_else(|| Chat::new(self.chat_id, ChatKind::Private, String::new(), now));

        let first_time = chat.timezone.is_none();
        chat.set_timezone(&self.timezone)
            .map_err(|e| UseCaseError::InvalidTimezone(e.0))?;
        chat.updated = now;

        ctx.repos
            .chats
            .upsert(&chat)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(SetTimezoneResponse {
            timezone: chat.timezone_or_utc(),
            first_time,
        })
    }
}
