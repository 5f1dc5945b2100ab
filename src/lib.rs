//! CRUD API Skeleton - account authentication and generic resource CRUD
//!
//! A REST backend with registration, login with lockout, email verification
//! and password reset, plus list/get/create/update/delete endpoints for
//! accounts (admin only) and bots, the latter with bulk operations.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **query**: Filter, sort and pagination parameters for listings
//! - **services**: Application use cases and notifications
//! - **infra**: Stores (database or in-memory), migrations and mail
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod query;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Account, AccountRole, Bot, Password};
pub use errors::{AppError, AppResult};
pub use infra::Persistence;
