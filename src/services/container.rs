//! Service Container - Centralized service access with parallel execution support.
//!
//! Features:
//! - Centralized access to all application services
//! - Thread-safe concurrent access via Arc
//! - Parallel execution utilities for independent operations

use std::future::Future;
use std::sync::Arc;

use super::{
    AccountManager, AccountService, AuthService, Authenticator, BotManager, BotService,
};
use crate::config::Config;
use crate::domain::{Argon2Hasher, PasswordHasher};
use crate::errors::AppResult;
use crate::infra::{LogMailer, Mailer, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get account administration service
    fn accounts(&self) -> Arc<dyn AccountService>;

    /// Get bot service
    fn bots(&self) -> Arc<dyn BotService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    bot_service: Arc<dyn BotService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        account_service: Arc<dyn AccountService>,
        bot_service: Arc<dyn BotService>,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            bot_service,
        }
    }

    /// Create service container over the given stores with the default
    /// hasher and mailer
    pub fn from_persistence(persistence: Persistence, config: &Config) -> Self {
        Self::with_components(persistence, Arc::new(Argon2Hasher), Arc::new(LogMailer), config)
    }

    /// Create service container with explicit hashing and mail components
    pub fn with_components(
        persistence: Persistence,
        hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn Mailer>,
        config: &Config,
    ) -> Self {
        let auth_service = Arc::new(Authenticator::new(
            persistence.clone(),
            hasher.clone(),
            mailer,
            config,
        ));
        let account_service = Arc::new(AccountManager::new(persistence.clone(), hasher));
        let bot_service = Arc::new(BotManager::new(persistence));

        Self::new(auth_service, account_service, bot_service)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn bots(&self) -> Arc<dyn BotService> {
        self.bot_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
///
/// These functions leverage tokio's async runtime to execute multiple
/// independent operations in parallel, improving throughput.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// Both operations run concurrently and the function returns when both complete.
    /// If either operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (items, total) = parallel::join2(
    ///     store.find_many(predicate, order, offset, limit),
    ///     store.count(predicate),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute a collection of homogeneous async operations in parallel.
    ///
    /// All operations must return the same type. Results are returned in
    /// the same order as the input futures.
    ///
    /// # Example
    /// ```ignore
    /// let futures: Vec<_> = ids
    ///     .iter()
    ///     .map(|id| services.bots().get(*id))
    ///     .collect();
    /// let bots = parallel::join_all(futures).await?;
    /// ```
    pub async fn join_all<F, T>(futures: Vec<F>) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
    {
        let results = futures::future::join_all(futures).await;
        results.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<i32> {
            Ok(2)
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn test_parallel_join_all() {
        let futures: Vec<_> = (0..5).map(|i| async move { Ok(i) as AppResult<i32> }).collect();
        let results = parallel::join_all(futures).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_parallel_join_all_fails_on_any_error() {
        use crate::errors::AppError;

        let futures: Vec<_> = (0..3)
            .map(|i| async move {
                if i == 1 {
                    Err(AppError::NotFound)
                } else {
                    Ok(i)
                }
            })
            .collect();
        assert!(matches!(parallel::join_all(futures).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_services_share_stores() {
        let config = Config::new("a-test-secret-that-is-long-enough-0123456789").unwrap();
        let services = Services::from_persistence(Persistence::memory(), &config);

        let bot = services
            .bots()
            .create(crate::domain::NewBot {
                name: "shared".to_string(),
                description: None,
                is_active: None,
            })
            .await
            .unwrap();
        assert_eq!(services.bots().get(bot.id).await.unwrap().name, "shared");
    }
}
