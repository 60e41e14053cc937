mod inmemory;
mod postgres;

use crate::repos::shared::repo::UpdateResult;
use chrono::{DateTime, Utc};
use dory_reminder_domain::Reminder;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Stores a new `Reminder` and returns the id assigned to it
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<i64>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<UpdateResult>;
    async fn find(&self, reminder_id: i64) -> anyhow::Result<Option<Reminder>>;
    /// All reminders of a chat ordered by ascending id
    async fn find_by_chat(&self, chat_id: i64) -> anyhow::Result<Vec<Reminder>>;
    /// Reminders which are not paused and due at `now`
    async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>>;
    async fn delete(&self, reminder_id: i64) -> anyhow::Result<Option<Reminder>>;
}
