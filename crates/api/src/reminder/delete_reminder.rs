use super::find_by_number;
use crate::shared::usecase::UseCase;
use dory_reminder_domain::Reminder;
use dory_reminder_infra::DoryContext;

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub chat_id: i64,
    pub number: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(usize),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &DoryContext) -> Result<Self::Response, Self::Error> {
        let reminder = find_by_number(ctx, self.chat_id, self.number)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::NotFound(self.number))?;

        ctx.repos
            .reminders
            .delete(reminder.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::NotFound(self.number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::setup_context;
    use chrono::Utc;
    use dory_reminder_domain::Repeat;

    #[actix_web::test]
    async fn deletes_by_position_and_renumbers() {
        let (ctx, _) = setup_context(Utc::now());
        let now = ctx.sys.now();
        for text in ["a", "b", "c"] {
            let reminder = Reminder::new(1, 2, text.into(), now, Repeat::Daily, now);
            ctx.repos.reminders.insert(&reminder).await.unwrap();
        }

        let mut usecase = DeleteReminderUseCase {
            chat_id: 1,
            number: 2,
        };
        assert_eq!(usecase.execute(&ctx).await.unwrap().text, "b");

        let left = ctx.repos.reminders.find_by_chat(1).await.unwrap();
        assert_eq!(
            left.iter().map(|r| r.text.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );

        let mut usecase = DeleteReminderUseCase {
            chat_id: 1,
            number: 3,
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(3))
        ));
    }

    #[actix_web::test]
    async fn other_chats_reminders_are_not_reachable() {
        let (ctx, _) = setup_context(Utc::now());
        let now = ctx.sys.now();
        let reminder = Reminder::new(1, 2, "mine".into(), now, Repeat::Daily, now);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let mut usecase = DeleteReminderUseCase {
            chat_id: 9,
            number: 1,
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(1))
        ));
        assert_eq!(ctx.repos.reminders.find_by_chat(1).await.unwrap().len(), 1);
    }
}
