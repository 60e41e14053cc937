use super::find_by_number;
use crate::shared::usecase::UseCase;
use dory_reminder_domain::Reminder;
use dory_reminder_infra::DoryContext;

/// Pauses or resumes a reminder. Paused reminders stay in the list but
/// are skipped by the delivery scheduler.
#[derive(Debug)]
pub struct SetReminderPausedUseCase {
    pub chat_id: i64,
    pub number: usize,
    pub paused: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(usize),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetReminderPausedUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "SetReminderPaused";

    async fn execute(&mut self, ctx: &DoryContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = find_by_number(ctx, self.chat_id, self.number)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::NotFound(self.number))?;

        reminder.paused = self.paused;
        reminder.updated = ctx.sys.now();
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
