//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion: stores, the password hasher and the mailer are
//! all injected.

mod account_service;
mod auth_service;
mod bot_service;
pub mod container;
pub mod crud;
pub mod notifications;
mod token;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService, CreateAccount, UpdateAccount};
pub use auth_service::{
    AuthService, Authenticator, Registration, VerifyResponse, ACCOUNT_UNIQUE_FIELDS,
};
pub use bot_service::{BotManager, BotService, BulkCreated, BulkDeleted, BulkModified};
pub use token::{AuthResponse, Claims, TokenIssuer, TokenResponse};

// Parallel execution utilities
pub use container::parallel;

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
