mod inmemory;
mod postgres;

use dory_reminder_domain::Chat;

pub use inmemory::InMemoryChatRepo;
pub use postgres::PostgresChatRepo;

#[async_trait::async_trait]
pub trait IChatRepo: Send + Sync {
    async fn find(&self, chat_id: i64) -> anyhow::Result<Option<Chat>>;
    /// Inserts the `Chat` or overwrites the stored one with the same id
    async fn upsert(&self, chat: &Chat) -> anyhow::Result<()>;
}
