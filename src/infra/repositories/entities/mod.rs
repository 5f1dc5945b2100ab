//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod access_log;
pub mod account;
pub mod bot;
pub mod forgot_password;
