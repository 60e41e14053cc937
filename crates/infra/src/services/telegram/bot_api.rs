use super::types::*;
use super::{IMessenger, IUpdateSource};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

const TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

pub struct TelegramBotApi {
    client: Client,
    token: String,
}

impl TelegramBotApi {
    pub fn new(token: String) -> Self {
        let client = Client::new();

        Self { client, token }
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        body: &impl Serialize,
        method: &str,
        timeout: Duration,
    ) -> anyhow::Result<T> {
        let res = match self
            .client
            .post(&format!("{}/bot{}/{}", TELEGRAM_API_BASE_URL, self.token, method))
            .timeout(timeout)
            .json(body)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                // The url carries the bot token
                let e = e.without_url();
                error!(
                    "[Network Error] Telegram Bot API {} error. Error message: {:?}",
                    method, e
                );
                return Err(anyhow::Error::new(e));
            }
        };

        let res = res.json::<TelegramResponse<T>>().await.map_err(|e| {
            let e = e.without_url();
            error!(
                "[Unexpected Response] Telegram Bot API {} error. Error message: {:?}",
                method, e
            );
            anyhow::Error::new(e)
        })?;

        match res {
            TelegramResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            TelegramResponse { description, .. } => {
                let description = description.unwrap_or_else(|| "no description".into());
                error!(
                    "[Rejected] Telegram Bot API {} error. Error message: {}",
                    method, description
                );
                Err(anyhow::anyhow!("Telegram rejected {}: {}", method, description))
            }
        }
    }
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait::async_trait]
impl IMessenger for TelegramBotApi {
    async fn send(&self, chat_id: i64, message: &OutgoingMessage) -> anyhow::Result<()> {
        for part in message.clone().into_parts() {
            let body = SendMessageRequest {
                chat_id,
                text: &part.text,
                reply_markup: part.keyboard.as_ref(),
            };
            self.post::<serde_json::Value>(&body, "sendMessage", REQUEST_TIMEOUT)
                .await?;
        }
        Ok(())
    }

    async fn answer_callback(&self, callback_query_id: &str) -> anyhow::Result<()> {
        let body = AnswerCallbackQueryRequest { callback_query_id };
        self.post::<bool>(&body, "answerCallbackQuery", REQUEST_TIMEOUT)
            .await
            .map(|_| ())
    }
}

#[async_trait::async_trait]
impl IUpdateSource for TelegramBotApi {
    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> anyhow::Result<Vec<Update>> {
        let body = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message", "callback_query"],
        };
        // The long poll itself may take the whole timeout
        let timeout = REQUEST_TIMEOUT + Duration::from_secs(timeout_secs);
        self.post(&body, "getUpdates", timeout).await
    }
}
