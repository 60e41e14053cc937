mod bot_api;
mod inmemory;
mod types;

pub use bot_api::TelegramBotApi;
pub use inmemory::{InMemoryMessenger, InMemoryUpdateSource, SentMessage};
pub use types::*;

/// Outbound side of the chat transport
#[async_trait::async_trait]
pub trait IMessenger: Send + Sync {
    async fn send(&self, chat_id: i64, message: &OutgoingMessage) -> anyhow::Result<()>;
    /// Stops the loading indicator of a pressed inline button
    async fn answer_callback(&self, callback_query_id: &str) -> anyhow::Result<()>;
}

/// Inbound side of the chat transport for long polling
#[async_trait::async_trait]
pub trait IUpdateSource: Send + Sync {
    /// Updates with an id of at least `offset`, waiting up to `timeout_secs`
    /// for new ones to arrive
    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> anyhow::Result<Vec<Update>>;
}
