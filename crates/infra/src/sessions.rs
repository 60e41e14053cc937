use dory_reminder_domain::{Session, SessionKey};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Wizard sessions in progress, at most one per chat member. Sessions
/// live until they are deleted or replaced, there is no expiry.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionKey, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionKey, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &SessionKey) -> Option<Session> {
        self.lock().get(key).cloned()
    }

    /// Inserts or replaces the session stored under its own key
    pub fn set(&self, session: Session) {
        self.lock().insert(session.key(), session);
    }

    pub fn delete(&self, key: &SessionKey) -> Option<Session> {
        self.lock().remove(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
