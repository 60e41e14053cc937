use super::find_by_number;
use crate::{chat::chat_timezone, shared::usecase::UseCase};
use chrono::{NaiveTime, Utc};
use dory_reminder_domain::{
    recurrence::{catch_up, localize, next_today},
    text_fits, Reminder,
};
use dory_reminder_infra::DoryContext;

/// Replaces the text of a reminder and optionally moves it to another
/// time of day
#[derive(Debug)]
pub struct EditReminderUseCase {
    pub chat_id: i64,
    pub number: usize,
    pub time: Option<NaiveTime>,
    pub text: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(usize),
    EmptyText,
    TooLong,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for EditReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "EditReminder";

    async fn execute(&mut self, ctx: &DoryContext) -> Result<Self::Response, Self::Error> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(UseCaseError::EmptyText);
        }
        if !text_fits(text) {
            return Err(UseCaseError::TooLong);
        }

        let mut reminder = find_by_number(ctx, self.chat_id, self.number)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::NotFound(self.number))?;

        let now = ctx.sys.now();
        reminder.text = text.to_string();
        reminder.updated = now;
        if let Some(time) = self.time {
            let tz = chat_timezone(ctx, self.chat_id)
                .await
                .map_err(|_| UseCaseError::StorageError)?
                .unwrap_or(chrono_tz::UTC);
            // Keep the scheduled day, only the time of day moves
            let scheduled = reminder.next_time.with_timezone(&tz);
            let now_local = now.with_timezone(&tz);
            let candidate = localize(&tz, scheduled.date_naive().and_time(time));
            let next = if candidate > now_local {
                candidate
            } else {
                catch_up(&reminder.repeat, &candidate, time, &now_local)
                    .unwrap_or_else(|| next_today(&now_local, time))
            };
            reminder.time_of_day = Some(time);
            reminder.next_time = next.with_timezone(&Utc);
        }

        let res = ctx
            .repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if !res.found() {
            return Err(UseCaseError::NotFound(self.number));
        }

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{insert_chat, setup_context};
    use chrono::{Datelike, TimeZone};
    use dory_reminder_domain::Repeat;

    #[actix_web::test]
    async fn edits_text_and_time() {
        // 10:00 in Moscow
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap();
        let (ctx, _) = setup_context(now);
        insert_chat(&ctx, 1, Some("Europe/Moscow")).await;
        let reminder = Reminder::new(1, 2, "old".into(), now, Repeat::Daily, now);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let mut usecase = EditReminderUseCase {
            chat_id: 1,
            number: 1,
            time: NaiveTime::from_hms_opt(8, 30, 0),
            text: " new ".into(),
        };
        let edited = usecase.execute(&ctx).await.unwrap();
        assert_eq!(edited.text, "new");
        // 08:30 already passed today in Moscow
        assert_eq!(
            edited.next_time,
            Utc.with_ymd_and_hms(2025, 6, 3, 5, 30, 0).unwrap()
        );

        let mut usecase = EditReminderUseCase {
            chat_id: 1,
            number: 1,
            time: None,
            text: "newer".into(),
        };
        let edited_again = usecase.execute(&ctx).await.unwrap();
        assert_eq!(edited_again.next_time, edited.next_time);
        assert_eq!(
            ctx.repos.reminders.find(edited.id).await.unwrap().unwrap().text,
            "newer"
        );
    }

    #[actix_web::test]
    async fn editing_time_keeps_weekly_day() {
        // Tuesday
        let now = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
        let (ctx, _) = setup_context(now);
        insert_chat(&ctx, 1, Some("UTC")).await;
        let monday = Utc.with_ymd_and_hms(2025, 6, 9, 9, 0, 0).unwrap();
        let reminder = Reminder::new(1, 2, "standup".into(), monday, Repeat::weekly(1).unwrap(), now);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let mut usecase = EditReminderUseCase {
            chat_id: 1,
            number: 1,
            time: NaiveTime::from_hms_opt(8, 0, 0),
            text: "standup".into(),
        };
        let edited = usecase.execute(&ctx).await.unwrap();
        assert_eq!(
            edited.next_time,
            Utc.with_ymd_and_hms(2025, 6, 9, 8, 0, 0).unwrap()
        );
        assert_eq!(edited.next_time.weekday(), chrono::Weekday::Mon);
        assert_eq!(edited.time_of_day, NaiveTime::from_hms_opt(8, 0, 0));
    }

    #[actix_web::test]
    async fn overlong_text_is_rejected() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap();
        let (ctx, _) = setup_context(now);
        let reminder = Reminder::new(1, 2, "short".into(), now, Repeat::Daily, now);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let mut usecase = EditReminderUseCase {
            chat_id: 1,
            number: 1,
            time: None,
            text: "x".repeat(dory_reminder_domain::MAX_TEXT_LEN + 1),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::TooLong)
        ));
        let stored = ctx.repos.reminders.find_by_chat(1).await.unwrap();
        assert_eq!(stored[0].text, "short");
    }

    #[actix_web::test]
    async fn unknown_number_is_not_found() {
        let (ctx, _) = setup_context(Utc::now());
        let mut usecase = EditReminderUseCase {
            chat_id: 1,
            number: 3,
            time: None,
            text: "x".into(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(3))
        ));
    }
}
