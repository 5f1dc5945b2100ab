//! Infrastructure layer - External systems integration
//!
//! Database connection and migrations, the store backends, and the mailer.

pub mod db;
pub mod mailer;
mod persistence;
pub mod repositories;

pub use db::{Database, Migrator};
pub use mailer::{Email, LogMailer, Mailer};
pub use persistence::Persistence;
pub use repositories::{AccountStore, MemoryStore, SeaStore, Store};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
