//! Domain layer - Core business entities and logic
//!
//! Entities, their insert/update payloads and value objects, independent of
//! how they are stored.

pub mod access_log;
pub mod account;
pub mod bot;
pub mod forgot_password;
pub mod password;
pub mod record;

pub use access_log::{AccessLog, ClientInfo, NewAccessLog};
pub use account::{Account, AccountInfo, AccountPatch, AccountRole, NewAccount};
pub use bot::{Bot, BotPatch, NewBot, BOT_UNIQUE_FIELDS};
pub use forgot_password::{ForgotPassword, ForgotPasswordPatch, NewForgotPassword};
pub use password::{Argon2Hasher, Password, PasswordHasher};
pub use record::Record;

#[cfg(any(test, feature = "test-utils"))]
pub use password::MockPasswordHasher;
