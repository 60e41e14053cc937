use super::IReminderRepo;
use crate::repos::shared::repo::UpdateResult;
use chrono::{DateTime, NaiveTime, Utc};
use dory_reminder_domain::{Reminder, Repeat, RepeatKind};
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    id: i64,
    chat_id: i64,
    user_id: i64,
    text: String,
    next_time: DateTime<Utc>,
    repeat: i16,
    repeat_param: String,
    time_of_day: Option<NaiveTime>,
    paused: bool,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> anyhow::Result<Self> {
        let kind = RepeatKind::from_code(raw.repeat)?;
        let repeat = Repeat::decode(kind, &raw.repeat_param)?;
        Ok(Self {
            id: raw.id,
            chat_id: raw.chat_id,
            user_id: raw.user_id,
            text: raw.text,
            next_time: raw.next_time,
            repeat,
            time_of_day: raw.time_of_day,
            paused: raw.paused,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

/// Malformed rows are logged and skipped
fn decode_rows(rows: Vec<ReminderRaw>) -> Vec<Reminder> {
    rows.into_iter()
        .filter_map(|raw| {
            let id = raw.id;
            match Reminder::try_from(raw) {
                Ok(reminder) => Some(reminder),
                Err(e) => {
                    error!("Skipping malformed reminder row with id: {}. Error: {:?}", id, e);
                    None
                }
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO reminders
            (chat_id, user_id, text, next_time, repeat, repeat_param, time_of_day, paused, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(reminder.chat_id)
        .bind(reminder.user_id)
        .bind(&reminder.text)
        .bind(reminder.next_time)
        .bind(reminder.repeat.kind().code())
        .bind(reminder.repeat.encode_params())
        .bind(reminder.time_of_day)
        .bind(reminder.paused)
        .bind(reminder.created)
        .bind(reminder.updated)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<UpdateResult> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET text = $2,
            next_time = $3,
            repeat = $4,
            repeat_param = $5,
            paused = $6,
            updated = $7,
            time_of_day = $8
            WHERE id = $1
            "#,
        )
        .bind(reminder.id)
        .bind(&reminder.text)
        .bind(reminder.next_time)
        .bind(reminder.repeat.kind().code())
        .bind(reminder.repeat.encode_params())
        .bind(reminder.paused)
        .bind(reminder.updated)
        .bind(reminder.time_of_day)
        .execute(&self.pool)
        .await?;

        Ok(UpdateResult {
            updated_count: res.rows_affected() as i64,
        })
    }

    async fn find(&self, reminder_id: i64) -> anyhow::Result<Option<Reminder>> {
        let raw: Option<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.id = $1
            "#,
        )
        .bind(reminder_id)
        .fetch_optional(&self.pool)
        .await?;

        raw.map(Reminder::try_from).transpose()
    }

    async fn find_by_chat(&self, chat_id: i64) -> anyhow::Result<Vec<Reminder>> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.chat_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_rows(rows))
    }

    async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE NOT r.paused AND r.next_time <= $1
            ORDER BY r.next_time
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_rows(rows))
    }

    async fn delete(&self, reminder_id: i64) -> anyhow::Result<Option<Reminder>> {
        let raw: Option<ReminderRaw> = sqlx::query_as(
            r#"
            DELETE FROM reminders AS r
            WHERE r.id = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id)
        .fetch_optional(&self.pool)
        .await?;

        raw.map(Reminder::try_from).transpose()
    }
}
