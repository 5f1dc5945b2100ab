//! Server error reports sent to the operators' chat.

use std::sync::Arc;

use chrono::Utc;

use super::{NotificationManager, TelegramProvider};
use crate::config::{Config, PROVIDER_TELEGRAM};

/// What is known about a request that ended in a server error
#[derive(Debug, Clone)]
pub struct FailedRequest {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub code: String,
    pub detail: String,
}

/// Formats failed requests and dispatches them in the background.
#[derive(Clone)]
pub struct ErrorReporter {
    manager: Arc<NotificationManager>,
    provider: String,
    recipient: Option<String>,
    environment: String,
}

impl ErrorReporter {
    pub fn new(
        manager: NotificationManager,
        provider: impl Into<String>,
        recipient: Option<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            manager: Arc::new(manager),
            provider: provider.into(),
            recipient,
            environment: environment.into(),
        }
    }

    /// Reporter that never sends anything
    pub fn disabled() -> Self {
        Self::new(NotificationManager::new(), PROVIDER_TELEGRAM, None, "")
    }

    /// Telegram reporter when a bot token is configured, disabled otherwise.
    pub fn from_config(config: &Config) -> Self {
        let mut manager = NotificationManager::new();
        match config.telegram_bot_token().map(TelegramProvider::new) {
            Some(Ok(provider)) => manager.register(PROVIDER_TELEGRAM, Arc::new(provider)),
            Some(Err(e)) => tracing::error!("Telegram provider unavailable: {}", e),
            None => tracing::warn!("TELEGRAM_BOT_TOKEN not set, error reporting disabled"),
        }

        if manager.has(PROVIDER_TELEGRAM) && config.telegram_chat_id.is_none() {
            tracing::warn!("TELEGRAM_CHAT_ID not set, error reports will not be sent");
        }

        Self::new(
            manager,
            PROVIDER_TELEGRAM,
            config.telegram_chat_id.clone(),
            config.app_env.clone(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.recipient.is_some() && self.manager.has(&self.provider)
    }

    /// Queue a report; delivery failures are only logged.
    pub fn report(&self, request: FailedRequest) {
        let Some(recipient) = self.recipient.clone() else {
            return;
        };
        if !self.manager.has(&self.provider) {
            return;
        }

        let message = self.format(&request);
        let manager = Arc::clone(&self.manager);
        let provider = self.provider.clone();
        tokio::spawn(async move {
            if let Err(e) = manager.notify(&provider, &recipient, &message).await {
                tracing::error!(%provider, "Failed to report error: {}", e);
            }
        });
    }

    fn format(&self, request: &FailedRequest) -> String {
        format!(
            "<b>Server error</b> {status}\n\n\
             <b>Environment:</b> {environment}\n\
             <b>Time:</b> {time}\n\
             <b>Request:</b> {method} {path}\n\
             <b>Code:</b> {code}\n\n\
             <code>{detail}</code>",
            status = request.status,
            environment = escape_html(&self.environment),
            time = Utc::now().to_rfc3339(),
            method = escape_html(&request.method),
            path = escape_html(&request.path),
            code = escape_html(&request.code),
            detail = escape_html(&request.detail),
        )
    }
}

/// Escape text for Telegram's HTML parse mode.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
