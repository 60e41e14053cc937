use crate::{chat::chat_timezone, shared::usecase::UseCase};
use chrono_tz::Tz;
use dory_reminder_domain::{
    wizard::{build_reminder, IncompleteSessionError},
    Reminder, Session,
};
use dory_reminder_infra::DoryContext;
use tracing::info;

/// Persists the reminder collected by a completed wizard session
#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub session: Session,
}

#[derive(Debug)]
pub struct CreatedReminder {
    pub reminder: Reminder,
    /// Timezone the first delivery was computed in
    pub timezone: Tz,
}

#[derive(Debug)]
pub enum UseCaseError {
    TimezoneMissing,
    IncompleteSession(IncompleteSessionError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = CreatedReminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &DoryContext) -> Result<Self::Response, Self::Error> {
        let tz = chat_timezone(ctx, self.session.chat_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::TimezoneMissing)?;

        let mut reminder = build_reminder(&self.session, &tz, ctx.sys.now())
            .map_err(UseCaseError::IncompleteSession)?;
        reminder.id = ctx
            .repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        info!(
            chat_id = reminder.chat_id,
            reminder_id = reminder.id,
            next_time = %reminder.next_time,
            "Reminder created"
        );
        Ok(CreatedReminder {
            reminder,
            timezone: tz,
        })
    }
}
