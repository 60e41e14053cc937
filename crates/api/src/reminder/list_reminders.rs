use crate::shared::usecase::UseCase;
use chrono_tz::Tz;
use dory_reminder_domain::Reminder;
use dory_reminder_infra::DoryContext;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug)]
pub struct ListRemindersUseCase {
    pub chat_id: i64,
    /// Zero based, pages past the end show the last page
    pub page: usize,
}

#[derive(Debug)]
pub struct ReminderPage {
    /// Reminders with their 1-based number in the chat
    pub entries: Vec<(usize, Reminder)>,
    pub page: usize,
    pub total_pages: usize,
    /// Timezone to show times in, UTC when the chat has none
    pub timezone: Tz,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ListRemindersUseCase {
    type Response = ReminderPage;

    type Error = UseCaseError;

    const NAME: &'static str = "ListReminders";

    async fn execute(&mut self, ctx: &DoryContext) -> Result<Self::Response, Self::Error> {
        let timezone = ctx
            .repos
            .chats
            .find(self.chat_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .map(|chat| chat.timezone_or_utc())
            .unwrap_or(chrono_tz::UTC);
        let reminders = ctx
            .repos
            .reminders
            .find_by_chat(self.chat_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let total_pages = ((reminders.len() + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
        let page = self.page.min(total_pages - 1);
        let entries = reminders
            .into_iter()
            .enumerate()
            .skip(page * PAGE_SIZE)
            .take(PAGE_SIZE)
            .map(|(index, reminder)| (index + 1, reminder))
            .collect();

        Ok(ReminderPage {
            entries,
            page,
            total_pages,
            timezone,
        })
    }
}
