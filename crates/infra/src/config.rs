use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram Bot API token. Without it no real transport can be created.
    pub telegram_token: Option<String>,
    /// Handle of the bot, removed from messages that mention it in groups
    pub bot_name: String,
    /// Port for the application to run on
    pub port: usize,
    /// Seconds between two runs of the delivery scheduler
    pub scheduler_interval_secs: u64,
    /// Whether to fetch updates by long polling. Turn off when Telegram
    /// is configured to push updates to the webhook route instead.
    pub telegram_polling: bool,
    /// Expected value of the `X-Telegram-Bot-Api-Secret-Token` header
    pub telegram_webhook_secret: Option<String>,
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T
where
    T: std::fmt::Display,
{
    let value = match std::env::var(name) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                name, value, default
            );
            default
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    pub fn new() -> Self {
        let telegram_token = optional_env("TELEGRAM_TOKEN");
        if telegram_token.is_none() {
            info!("Did not find TELEGRAM_TOKEN environment variable. Messages will not reach Telegram.");
        }
        let bot_name = optional_env("BOT_NAME")
            .map(|name| name.trim_start_matches('@').to_string())
            .unwrap_or_else(|| "reminder_bot".into());

        let mut scheduler_interval_secs = parse_env("SCHEDULER_INTERVAL_SECS", 30u64);
        if scheduler_interval_secs == 0 {
            warn!("SCHEDULER_INTERVAL_SECS must be positive, falling back to the default: 30.");
            scheduler_interval_secs = 30;
        }

        Self {
            telegram_token,
            bot_name,
            port: parse_env("PORT", 5000),
            scheduler_interval_secs,
            telegram_polling: parse_env("TELEGRAM_POLLING", true),
            telegram_webhook_secret: optional_env("TELEGRAM_WEBHOOK_SECRET"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
