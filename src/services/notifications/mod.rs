//! Outgoing notifications.
//!
//! Providers are registered by name in a [`NotificationManager`]; the
//! [`ErrorReporter`] uses it to alert operators about server errors.

mod reporter;
mod telegram;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use reporter::{ErrorReporter, FailedRequest};
pub use telegram::TelegramProvider;

/// Notification delivery errors
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification provider '{0}' not found")]
    UnknownProvider(String),

    #[error("Failed to send notification: {0}")]
    Send(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A channel able to deliver a text message to a recipient.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), NotificationError>;
}

/// Registry of notification providers by name
#[derive(Default, Clone)]
pub struct NotificationManager {
    providers: HashMap<String, Arc<dyn NotificationProvider>>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn NotificationProvider>) {
        let name = name.into();
        tracing::info!(provider = %name, "Notification provider registered");
        self.providers.insert(name, provider);
    }

    pub fn has(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Send a message through the named provider.
    pub async fn notify(
        &self,
        provider: &str,
        recipient: &str,
        message: &str,
    ) -> Result<(), NotificationError> {
        let selected = self
            .providers
            .get(provider)
            .ok_or_else(|| NotificationError::UnknownProvider(provider.to_string()))?;
        selected.send(recipient, message).await
    }
}
