mod chat;
mod reminder;
mod shared;

use chat::PostgresChatRepo;
use reminder::PostgresReminderRepo;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

pub use chat::{IChatRepo, InMemoryChatRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo};
pub use shared::repo::UpdateResult;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub chats: Arc<dyn IChatRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self {
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            chats: Arc::new(PostgresChatRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            chats: Arc::new(InMemoryChatRepo::new()),
        }
    }
}

/// In-memory repos plus the postgres ones when `DATABASE_URL` is set
#[cfg(test)]
pub(crate) async fn create_test_repos() -> Vec<Repos> {
    let mut repos = vec![Repos::create_inmemory()];
    if let Ok(url) = std::env::var("DATABASE_URL") {
        repos.push(Repos::create_postgres(&url).await.unwrap());
    }
    repos
}

/// Chat id not used by any earlier test run, the postgres tables are shared
#[cfg(test)]
pub(crate) fn unique_chat_id() -> i64 {
    use std::sync::atomic::{AtomicI64, Ordering};
    static COUNTER: AtomicI64 = AtomicI64::new(0);
    chrono::Utc::now().timestamp_micros() * 100 + COUNTER.fetch_add(1, Ordering::Relaxed) % 100
}
