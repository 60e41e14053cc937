use super::IChatRepo;
use crate::repos::shared::inmemory_repo::*;
use dory_reminder_domain::Chat;
use std::sync::Mutex;

pub struct InMemoryChatRepo {
    chats: Mutex<Vec<Chat>>,
}

impl InMemoryChatRepo {
    pub fn new() -> Self {
        Self {
            chats: Mutex::new(vec![]),
        }
    }
}

impl Default for InMemoryChatRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IChatRepo for InMemoryChatRepo {
    async fn find(&self, chat_id: i64) -> anyhow::Result<Option<Chat>> {
        Ok(find(chat_id, &self.chats))
    }

    async fn upsert(&self, chat: &Chat) -> anyhow::Result<()> {
        upsert(chat, &self.chats);
        Ok(())
    }
}
