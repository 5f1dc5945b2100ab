//! Telegram Bot API provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{NotificationError, NotificationProvider};
use crate::config::{NOTIFICATION_TIMEOUT_SECONDS, TELEGRAM_API_URL, TELEGRAM_MAX_MESSAGE_LENGTH};

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Sends HTML messages through `sendMessage`
pub struct TelegramProvider {
    client: Client,
    endpoint: String,
}

impl TelegramProvider {
    pub fn new(bot_token: &str) -> Result<Self, NotificationError> {
        Self::with_api_url(TELEGRAM_API_URL, bot_token)
    }

    /// Provider talking to a custom Bot API server.
    pub fn with_api_url(api_url: &str, bot_token: &str) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(NOTIFICATION_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), bot_token),
        })
    }
}

/// Cut a message to Telegram's length limit on a character boundary.
fn truncate(message: &str) -> &str {
    match message.char_indices().nth(TELEGRAM_MAX_MESSAGE_LENGTH) {
        Some((index, _)) => &message[..index],
        None => message,
    }
}

#[async_trait]
impl NotificationProvider for TelegramProvider {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), NotificationError> {
        let body = SendMessage {
            chat_id: recipient,
            text: truncate(message),
            parse_mode: "HTML",
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NotificationError::Send(format!("{}: {}", status, detail)));
        }

        tracing::debug!(chat_id = recipient, "Telegram message sent");
        Ok(())
    }
}
