use super::types::{OutgoingMessage, Update};
use super::{IMessenger, IUpdateSource};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message: OutgoingMessage,
}

/// Records every message instead of sending it. Chats registered with
/// `fail_for` get a transport error.
#[derive(Default)]
pub struct InMemoryMessenger {
    sent: Mutex<Vec<SentMessage>>,
    answered: Mutex<Vec<String>>,
    failing_chats: Mutex<HashSet<i64>>,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, chat_id: i64) {
        lock(&self.failing_chats).insert(chat_id);
    }

    pub fn recover(&self, chat_id: i64) {
        lock(&self.failing_chats).remove(&chat_id);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        lock(&self.sent).clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<OutgoingMessage> {
        lock(&self.sent)
            .iter()
            .filter(|sent| sent.chat_id == chat_id)
            .map(|sent| sent.message.clone())
            .collect()
    }

    pub fn last_sent_to(&self, chat_id: i64) -> Option<OutgoingMessage> {
        self.sent_to(chat_id).pop()
    }

    pub fn answered_callbacks(&self) -> Vec<String> {
        lock(&self.answered).clone()
    }

    pub fn clear(&self) {
        lock(&self.sent).clear();
    }
}

#[async_trait::async_trait]
impl IMessenger for InMemoryMessenger {
    async fn send(&self, chat_id: i64, message: &OutgoingMessage) -> anyhow::Result<()> {
        if lock(&self.failing_chats).contains(&chat_id) {
            anyhow::bail!("Chat: {} is unreachable", chat_id);
        }
        let mut sent = lock(&self.sent);
        for part in message.clone().into_parts() {
            sent.push(SentMessage {
                chat_id,
                message: part,
            });
        }
        Ok(())
    }

    async fn answer_callback(&self, callback_query_id: &str) -> anyhow::Result<()> {
        lock(&self.answered).push(callback_query_id.to_string());
        Ok(())
    }
}

/// Hands out queued updates once, the way Telegram confirms them by offset
#[derive(Default)]
pub struct InMemoryUpdateSource {
    queue: Mutex<VecDeque<Update>>,
}

impl InMemoryUpdateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, update: Update) {
        lock(&self.queue).push_back(update);
    }
}

#[async_trait::async_trait]
impl IUpdateSource for InMemoryUpdateSource {
    async fn get_updates(&self, offset: i64, _timeout_secs: u64) -> anyhow::Result<Vec<Update>> {
        let mut queue = lock(&self.queue);
        queue.retain(|update| update.update_id >= offset);
        Ok(queue.iter().cloned().collect())
    }
}
