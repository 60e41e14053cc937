use chrono::{DateTime, Utc};
use dory_reminder_api::Application;
use dory_reminder_infra::{telegram::InMemoryMessenger, DoryContext, StaticTimeSys};
use std::sync::Arc;

pub struct TestApp {
    pub ctx: DoryContext,
    pub messenger: Arc<InMemoryMessenger>,
    pub address: String,
}

/// In-memory context that records outgoing messages, frozen at `now`
pub fn test_context(now: DateTime<Utc>) -> (DoryContext, Arc<InMemoryMessenger>) {
    let messenger = Arc::new(InMemoryMessenger::new());
    let mut ctx = DoryContext::create_inmemory(messenger.clone());
    ctx.sys = Arc::new(StaticTimeSys { now });
    ctx.config.telegram_token = None;
    ctx.config.telegram_webhook_secret = None;
    (ctx, messenger)
}

/// The same storage and transport seen at a later instant
pub fn at_time(ctx: &DoryContext, now: DateTime<Utc>) -> DoryContext {
    let mut ctx = ctx.clone();
    ctx.sys = Arc::new(StaticTimeSys { now });
    ctx
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    let (mut ctx, messenger) = test_context(Utc::now());
    ctx.config.port = 0; // Random port

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        ctx,
        messenger,
        address,
    }
}
