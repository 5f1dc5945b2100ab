//! Application settings loaded from environment variables.

use std::env;

use thiserror::Error;

use super::constants::{
    DEFAULT_APP_ENV, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_MINUTES, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, ENV_PRODUCTION, MEMORY_DATABASE_URL, MIN_JWT_SECRET_LENGTH,
};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable must be set in production")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {0} characters long")]
    JwtSecretTooShort(usize),
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    /// Wrap signed tokens in an outer signed envelope
    pub token_wrapping: bool,
    pub server_host: String,
    pub server_port: u16,
    pub app_env: String,
    telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("token_wrapping", &self.token_wrapping)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("app_env", &self.app_env)
            .field(
                "telegram_bot_token",
                &self.telegram_bot_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In debug builds a missing `JWT_SECRET` falls back to an insecure
    /// development secret; release builds refuse to start without one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => return Err(ConfigError::MissingJwtSecret),
        };

        let mut config = Self::new(jwt_secret)?;

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(minutes) = env::var("JWT_EXPIRATION_IN_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.jwt_expiration_minutes = minutes;
        }
        if let Ok(flag) = env::var("TOKEN_WRAPPING") {
            config.token_wrapping = parse_flag(&flag);
        }
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }
        if let Some(port) = env::var("SERVER_PORT").ok().and_then(|v| v.parse().ok()) {
            config.server_port = port;
        }
        if let Ok(app_env) = env::var("APP_ENV") {
            config.app_env = app_env;
        }
        config.telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN").ok().filter(|v| !v.is_empty());
        config.telegram_chat_id = env::var("TELEGRAM_CHAT_ID").ok().filter(|v| !v.is_empty());

        Ok(config)
    }

    /// Build a configuration with defaults around the given signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Result<Self, ConfigError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::JwtSecretTooShort(MIN_JWT_SECRET_LENGTH));
        }

        Ok(Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret,
            jwt_expiration_minutes: DEFAULT_JWT_EXPIRATION_MINUTES,
            token_wrapping: true,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            app_env: DEFAULT_APP_ENV.to_string(),
            telegram_bot_token: None,
            telegram_chat_id: None,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Telegram bot token, if notifications are configured.
    pub fn telegram_bot_token(&self) -> Option<&str> {
        self.telegram_bot_token.as_deref()
    }

    /// Whether verification codes must be kept out of responses.
    pub fn is_production(&self) -> bool {
        self.app_env == ENV_PRODUCTION
    }

    /// Whether the in-memory backend was selected instead of a database.
    pub fn uses_memory_backend(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_is_rejected() {
        let result = Config::new("too-short");
        assert!(matches!(result, Err(ConfigError::JwtSecretTooShort(_))));
    }

    #[test]
    fn test_defaults() {
        let config = Config::new("a-secret-that-is-long-enough-for-hs256").unwrap();
        assert_eq!(config.jwt_expiration_minutes, 60);
        assert!(config.token_wrapping);
        assert!(!config.is_production());
        assert!(!config.uses_memory_backend());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("a-secret-that-is-long-enough-for-hs256").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("a-secret-that-is-long-enough"));
        assert!(debug.contains("[REDACTED]"));
    }
}
