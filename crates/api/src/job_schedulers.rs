use crate::{
    reminder::deliver_due_reminders::DeliverDueRemindersUseCase,
    shared::usecase::execute,
    telegram::router::handle_update,
};
use actix_web::rt::time::{interval_at, sleep, Instant};
use dory_reminder_infra::{telegram::Update, DoryContext};
use std::time::Duration;
use tokio::{sync::watch, time::MissedTickBehavior};
use tracing::{info, warn};

/// Long polling timeout passed to Telegram
const POLL_TIMEOUT_SECS: u64 = 30;
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);
const POLL_IDLE_PAUSE: Duration = Duration::from_secs(1);

/// Seconds until the next multiple of `interval_secs` since the epoch, so
/// ticks land on round wall-clock times
pub fn get_start_delay(now_ts: i64, interval_secs: u64) -> u64 {
    let interval = interval_secs.max(1) as i64;
    (interval - now_ts.rem_euclid(interval)) as u64
}

pub fn start_send_reminders_job(ctx: DoryContext, mut shutdown: watch::Receiver<bool>) {
    actix_web::rt::spawn(async move {
        let period = ctx.config.scheduler_interval_secs;
        let delay = get_start_delay(ctx.sys.now().timestamp(), period);
        let start = Instant::now() + Duration::from_secs(delay);
        let mut ticks = interval_at(start, Duration::from_secs(period));
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_secs = period, first_tick_in_secs = delay, "Delivery scheduler started");

        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    let _ = execute(DeliverDueRemindersUseCase {}, &ctx).await;
                }
                _ = shutdown.changed() => break,
            }
        }
        info!("Delivery scheduler stopped");
    });
}

/// Handles a fetched batch in order and returns the offset that confirms it
async fn handle_batch(ctx: &DoryContext, offset: i64, updates: &[Update]) -> i64 {
    let mut next_offset = offset;
    for update in updates {
        handle_update(ctx, update).await;
        next_offset = next_offset.max(update.update_id + 1);
    }
    next_offset
}

/// Fetches one batch of updates after `offset`, handles them in order and
/// returns the offset that confirms them
pub async fn poll_updates_once(ctx: &DoryContext, offset: i64) -> anyhow::Result<i64> {
    let updates = ctx.updates.get_updates(offset, POLL_TIMEOUT_SECS).await?;
    Ok(handle_batch(ctx, offset, &updates).await)
}

/// Sleeps for `duration` unless shutdown comes first, returns whether to
/// keep polling
async fn pause(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = sleep(duration) => true,
        _ = shutdown.changed() => false,
    }
}

/// Polls until shutdown and returns the last confirmed offset. Only the
/// wait for updates is cut short by shutdown, a fetched batch is always
/// handled to the end.
async fn run_updates_poller(ctx: &DoryContext, mut shutdown: watch::Receiver<bool>) -> i64 {
    let mut offset = 0;
    while !*shutdown.borrow_and_update() {
        let fetched = tokio::select! {
            fetched = ctx.updates.get_updates(offset, POLL_TIMEOUT_SECS) => fetched,
            _ = shutdown.changed() => break,
        };
        match fetched {
            Ok(updates) if updates.is_empty() => {
                if !pause(POLL_IDLE_PAUSE, &mut shutdown).await {
                    break;
                }
            }
            Ok(updates) => offset = handle_batch(ctx, offset, &updates).await,
            Err(e) => {
                warn!("Failed to fetch updates: {:?}", e);
                if !pause(POLL_ERROR_BACKOFF, &mut shutdown).await {
                    break;
                }
            }
        }
    }
    offset
}

pub fn start_updates_poller(ctx: DoryContext, shutdown: watch::Receiver<bool>) {
    actix_web::rt::spawn(async move {
        info!("Polling Telegram for updates");
        let offset = run_updates_poller(&ctx, shutdown).await;
        info!(offset, "Stopped polling Telegram");
    });
}
