use crate::{
    chat::chat_timezone,
    shared::{texts, usecase::UseCase},
};
use dory_reminder_domain::Reminder;
use dory_reminder_infra::{telegram::OutgoingMessage, DoryContext};
use tracing::{error, info, warn};

/// One run of the delivery scheduler: sends every due reminder, then
/// deletes one-shot reminders and moves recurring ones to their next
/// occurrence. Failures only affect the reminder they happened for.
#[derive(Debug)]
pub struct DeliverDueRemindersUseCase {}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub due: usize,
    pub delivered: usize,
    /// One-shot reminders deleted after delivery
    pub retired: usize,
    pub rescheduled: usize,
    /// Reminders whose delivery or bookkeeping failed. They stay due and
    /// are picked up again by the next run.
    pub failed: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

enum Outcome {
    Retired,
    Rescheduled,
    Failed,
}

async fn deliver(ctx: &DoryContext, mut reminder: Reminder) -> Outcome {
    let message = OutgoingMessage::text(texts::delivery(&reminder.text));
    if let Err(e) = ctx.messenger.send(reminder.chat_id, &message).await {
        warn!(
            chat_id = reminder.chat_id,
            reminder_id = reminder.id,
            "Failed to deliver reminder: {:?}",
            e
        );
        return Outcome::Failed;
    }
    info!(
        chat_id = reminder.chat_id,
        reminder_id = reminder.id,
        "Reminder delivered"
    );

    if !reminder.repeat.is_recurring() {
        return match ctx.repos.reminders.delete(reminder.id).await {
            Ok(_) => Outcome::Retired,
            Err(e) => {
                error!(
                    reminder_id = reminder.id,
                    "Failed to delete delivered reminder: {:?}", e
                );
                Outcome::Failed
            }
        };
    }

    let tz = match chat_timezone(ctx, reminder.chat_id).await {
        Ok(Some(tz)) => tz,
        Ok(None) => chrono_tz::UTC,
        Err(e) => {
            warn!(
                chat_id = reminder.chat_id,
                "Failed to load chat timezone, rescheduling in UTC: {:?}", e
            );
            chrono_tz::UTC
        }
    };
    reminder.reschedule(&tz, ctx.sys.now());

    match ctx.repos.reminders.save(&reminder).await {
        Ok(_) => {
            info!(
                reminder_id = reminder.id,
                next_time = %reminder.next_time,
                "Reminder rescheduled"
            );
            Outcome::Rescheduled
        }
        Err(e) => {
            error!(
                reminder_id = reminder.id,
                "Failed to save rescheduled reminder: {:?}", e
            );
            Outcome::Failed
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeliverDueRemindersUseCase {
    type Response = DeliverySummary;

    type Error = UseCaseError;

    const NAME: &'static str = "DeliverDueReminders";

    async fn execute(&mut self, ctx: &DoryContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let due = ctx
            .repos
            .reminders
            .find_due(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut summary = DeliverySummary {
            due: due.len(),
            ..Default::default()
        };
        for reminder in due {
            match deliver(ctx, reminder).await {
                Outcome::Retired => {
                    summary.delivered += 1;
                    summary.retired += 1;
                }
                Outcome::Rescheduled => {
                    summary.delivered += 1;
                    summary.rescheduled += 1;
                }
                Outcome::Failed => summary.failed += 1,
            }
        }

        if summary.due > 0 {
            info!(
                due = summary.due,
                delivered = summary.delivered,
                failed = summary.failed,
                "Delivery run finished"
            );
        }
        Ok(summary)
    }
}
