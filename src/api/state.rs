//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, Persistence};
use crate::services::notifications::ErrorReporter;
use crate::services::{AccountService, AuthService, BotService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Account administration service
    pub account_service: Arc<dyn AccountService>,
    /// Bot service
    pub bot_service: Arc<dyn BotService>,
    /// Server error notifications
    pub reporter: ErrorReporter,
    /// Database connection, absent with the in-memory backend
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state over the given stores.
    pub fn from_config(
        persistence: Persistence,
        database: Option<Arc<Database>>,
        config: &Config,
    ) -> Self {
        Self::new(
            &Services::from_persistence(persistence, config),
            ErrorReporter::from_config(config),
            database,
        )
    }

    /// Create application state from an existing service container.
    pub fn new(
        services: &dyn ServiceContainer,
        reporter: ErrorReporter,
        database: Option<Arc<Database>>,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            account_service: services.accounts(),
            bot_service: services.bots(),
            reporter,
            database,
        }
    }
}
