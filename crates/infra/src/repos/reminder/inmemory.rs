use super::IReminderRepo;
use crate::repos::shared::{inmemory_repo::*, repo::UpdateResult};
use chrono::{DateTime, Utc};
use dory_reminder_domain::Reminder;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
    next_id: AtomicI64,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(vec![]),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut reminder = reminder.clone();
        reminder.id = id;
        insert(&reminder, &self.reminders);
        Ok(id)
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<UpdateResult> {
        Ok(save(reminder, &self.reminders))
    }

    async fn find(&self, reminder_id: i64) -> anyhow::Result<Option<Reminder>> {
        Ok(find(reminder_id, &self.reminders))
    }

    async fn find_by_chat(&self, chat_id: i64) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r| r.chat_id == chat_id);
        reminders.sort_by_key(|r| r.id);
        Ok(reminders)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r| r.is_due(&now));
        reminders.sort_by_key(|r| r.next_time);
        Ok(reminders)
    }

    async fn delete(&self, reminder_id: i64) -> anyhow::Result<Option<Reminder>> {
        Ok(delete(reminder_id, &self.reminders))
    }
}
