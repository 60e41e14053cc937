use crate::shared::usecase::UseCase;
use dory_reminder_domain::{Chat, ChatKind};
use dory_reminder_infra::DoryContext;

/// Records the chat an update came from, keeping settings of known chats
#[derive(Debug)]
pub struct RegisterChatUseCase {
    pub chat_id: i64,
    pub kind: ChatKind,
    pub name: String,
    pub username: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RegisterChatUseCase {
    type Response = Chat;

    type Error = UseCaseError;

    const NAME: &'static str = "RegisterChat";

    async fn execute(&mut self, ctx: &DoryContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let existing = ctx
            .repos
            .chats
            .find(self.chat_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let chat = match existing {
            Some(mut chat) => {
                if chat.kind == self.kind && chat.name == self.name && chat.username == self.username
                {
                    return Ok(chat);
                }
                chat.kind = self.kind;
                chat.name = self.name.clone();
                chat.username = self.username.clone();
                chat.updated = now;
                chat
            }
            None => {
                let mut chat = Chat::new(self.chat_id, self.kind, self.name.clone(), now);
                chat.username = self.username.clone();
                chat
            }
        };

        ctx.repos
            .chats
            .upsert(&chat)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(chat)
    }
}
