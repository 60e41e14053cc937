pub mod create_reminder;
pub mod deliver_due_reminders;
pub mod delete_reminder;
pub mod edit_reminder;
pub mod list_reminders;
pub mod set_reminder_paused;

use dory_reminder_domain::Reminder;
use dory_reminder_infra::DoryContext;

/// Reminders are addressed by their 1-based position in the chat's list
pub async fn find_by_number(
    ctx: &DoryContext,
    chat_id: i64,
    number: usize,
) -> anyhow::Result<Option<Reminder>> {
    if number == 0 {
        return Ok(None);
    }
    let mut reminders = ctx.repos.reminders.find_by_chat(chat_id).await?;
    if number > reminders.len() {
        return Ok(None);
    }
    Ok(Some(reminders.swap_remove(number - 1)))
}
