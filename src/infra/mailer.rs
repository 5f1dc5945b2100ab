//! Outgoing email.
//!
//! Emails are rendered and logged, never delivered.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::errors::AppResult;

/// An email ready to be handed to a mailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Email {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Welcome email carrying the address verification code
    pub fn verification(to: &str, name: &str, code: &str) -> Self {
        Self::new(
            to,
            "Verify your email",
            format!(
                "Hello {},\n\nWelcome! Verify your email address with this code: {}\n",
                name, code
            ),
        )
    }

    /// Password reset email carrying the reset code
    pub fn password_reset(to: &str, code: &str) -> Self {
        Self::new(
            to,
            "Password reset",
            format!(
                "A password reset was requested for this address.\n\nReset code: {}\n\n\
                 If you did not request it, ignore this email.\n",
                code
            ),
        )
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> AppResult<()>;
}

/// Mailer that writes emails to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> AppResult<()> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Email (not delivered):\n{}",
            email.body
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_carry_codes() {
        let email = Email::verification("a@example.com", "Ada", "abc-123");
        assert_eq!(email.to, "a@example.com");
        assert!(email.body.contains("abc-123"));
        assert!(email.body.contains("Ada"));

        assert!(Email::password_reset("a@example.com", "xyz").body.contains("xyz"));
    }

    #[tokio::test]
    async fn test_log_mailer_never_fails() {
        assert!(LogMailer.send(Email::new("a@b.c", "s", "b")).await.is_ok());
    }
}
