use super::IChatRepo;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dory_reminder_domain::{Chat, ChatKind};
use sqlx::{FromRow, PgPool};
use tracing::warn;

pub struct PostgresChatRepo {
    pool: PgPool,
}

impl PostgresChatRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ChatRaw {
    chat_id: i64,
    kind: String,
    name: String,
    username: Option<String>,
    timezone: Option<String>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl TryFrom<ChatRaw> for Chat {
    type Error = anyhow::Error;

    fn try_from(raw: ChatRaw) -> anyhow::Result<Self> {
        let timezone = match raw.timezone {
            Some(name) => match name.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    warn!("Chat: {} has an unknown timezone stored: {}", raw.chat_id, name);
                    None
                }
            },
            None => None,
        };
        Ok(Self {
            id: raw.chat_id,
            kind: raw.kind.parse::<ChatKind>()?,
            name: raw.name,
            username: raw.username,
            timezone,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

#[async_trait::async_trait]
impl IChatRepo for PostgresChatRepo {
    async fn find(&self, chat_id: i64) -> anyhow::Result<Option<Chat>> {
        let raw: Option<ChatRaw> = sqlx::query_as(
            r#"
            SELECT * FROM chats AS c
            WHERE c.chat_id = $1
            "#,
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        raw.map(Chat::try_from).transpose()
    }

    async fn upsert(&self, chat: &Chat) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO chats(chat_id, kind, name, username, timezone, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (chat_id) DO UPDATE
            SET kind = $2,
            name = $3,
            username = $4,
            timezone = $5,
            updated = $7
            "#,
        )
        .bind(chat.id)
        .bind(chat.kind.as_str())
        .bind(&chat.name)
        .bind(&chat.username)
        .bind(chat.timezone.map(|tz| tz.name().to_string()))
        .bind(chat.created)
        .bind(chat.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
