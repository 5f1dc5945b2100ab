//! Account administration - CRUD over accounts for admin roles.

use std::sync::Arc;

use async_trait::async_trait;

use super::auth_service::{normalize_email, ACCOUNT_UNIQUE_FIELDS};
use super::crud::{assert_unique, get_item, list_items};
use crate::domain::{Account, AccountPatch, AccountRole, NewAccount, PasswordHasher};
use crate::errors::AppResult;
use crate::infra::Persistence;
use crate::query::{ListLimits, ListQuery, Predicate};
use crate::types::PaginatedResult;

/// Account created by an administrator
#[derive(Debug, Clone, Default)]
pub struct CreateAccount {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
    pub role: AccountRole,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub url_twitter: Option<String>,
    pub url_github: Option<String>,
}

/// Fields an administrator may change; `None` leaves the field as is
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<AccountRole>,
    pub verified: Option<bool>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub url_twitter: Option<String>,
    pub url_github: Option<String>,
}

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Filtered, paginated account listing
    async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResult<Account>>;

    async fn get(&self, id: i32) -> AppResult<Account>;

    /// Create an account; the email must be unused
    async fn create(&self, input: CreateAccount) -> AppResult<Account>;

    /// Update an account; a changed email must be unused by other accounts
    async fn update(&self, id: i32, input: UpdateAccount) -> AppResult<Account>;

    /// Delete an account along with its access history
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct AccountManager {
    persistence: Persistence,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountManager {
    pub fn new(persistence: Persistence, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            persistence,
            hasher,
        }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn list(&self, query: &ListQuery) -> AppResult<PaginatedResult<Account>> {
        list_items::<Account, _>(&*self.persistence.accounts, query, ListLimits::LISTING).await
    }

    async fn get(&self, id: i32) -> AppResult<Account> {
        get_item::<Account, _>(&*self.persistence.accounts, id).await
    }

    async fn create(&self, input: CreateAccount) -> AppResult<Account> {
        let new = NewAccount {
            first_name: input.first_name,
            last_name: input.last_name,
            email: normalize_email(&input.email),
            role: input.role,
            phone: input.phone,
            city: input.city,
            country: input.country,
            url_twitter: input.url_twitter,
            url_github: input.url_github,
            ..Default::default()
        };
        assert_unique::<Account, _, _>(
            &*self.persistence.accounts,
            &new,
            ACCOUNT_UNIQUE_FIELDS,
            None,
        )
        .await?;

        let new = NewAccount {
            password_hash: self.hasher.hash(&input.password)?,
            ..new
        };
        let account = self.persistence.accounts.insert(new).await?;
        tracing::info!(account_id = account.id, role = %account.role, "Account created");
        Ok(account)
    }

    async fn update(&self, id: i32, input: UpdateAccount) -> AppResult<Account> {
        let patch = AccountPatch {
            first_name: input.first_name,
            last_name: input.last_name.map(Some),
            email: input.email.as_deref().map(normalize_email),
            password_hash: input
                .password
                .as_deref()
                .map(|password| self.hasher.hash(password))
                .transpose()?,
            role: input.role,
            verified: input.verified,
            phone: input.phone.map(Some),
            city: input.city.map(Some),
            country: input.country.map(Some),
            url_twitter: input.url_twitter.map(Some),
            url_github: input.url_github.map(Some),
            ..Default::default()
        };
        assert_unique::<Account, _, _>(
            &*self.persistence.accounts,
            &patch,
            ACCOUNT_UNIQUE_FIELDS,
            Some(id),
        )
        .await?;

        self.persistence.accounts.update(id, patch).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let account = self.get(id).await?;
        self.persistence.accounts.delete(id).await?;

        let history = self
            .persistence
            .access_logs
            .delete_where(&Predicate::Eq("email", account.email.as_str().into()))
            .await?;
        tracing::info!(account_id = id, access_logs = history.len(), "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Argon2Hasher, ClientInfo, NewAccessLog};
    use crate::errors::AppError;

    fn manager() -> (AccountManager, Persistence) {
        let persistence = Persistence::memory();
        let manager = AccountManager::new(persistence.clone(), Arc::new(Argon2Hasher));
        (manager, persistence)
    }

    fn input(email: &str) -> CreateAccount {
        CreateAccount {
            first_name: "Grace".to_string(),
            email: email.to_string(),
            password: "hopper-1906".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let (manager, _) = manager();
        let account = manager.create(input("Grace@Navy.mil")).await.unwrap();

        assert_eq!(account.email, "grace@navy.mil");
        assert_ne!(account.password_hash, "hopper-1906");
        assert!(Argon2Hasher.verify("hopper-1906", &account.password_hash));
    }

    #[tokio::test]
    async fn test_update_email_uniqueness_excludes_self() {
        let (manager, _) = manager();
        let grace = manager.create(input("grace@navy.mil")).await.unwrap();
        manager.create(input("ada@example.com")).await.unwrap();

        let same = UpdateAccount {
            email: Some("grace@navy.mil".to_string()),
            city: Some("Arlington".to_string()),
            ..Default::default()
        };
        let updated = manager.update(grace.id, same).await.unwrap();
        assert_eq!(updated.city.as_deref(), Some("Arlington"));

        let taken = UpdateAccount {
            email: Some("ADA@example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            manager.update(grace.id, taken).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_access_logs() {
        let (manager, persistence) = manager();
        let grace = manager.create(input("grace@navy.mil")).await.unwrap();
        let ada = manager.create(input("ada@example.com")).await.unwrap();
        for email in [&grace.email, &grace.email, &ada.email] {
            persistence
                .access_logs
                .insert(NewAccessLog {
                    email: email.clone(),
                    client: ClientInfo::default(),
                })
                .await
                .unwrap();
        }

        manager.delete(grace.id).await.unwrap();

        assert!(matches!(manager.get(grace.id).await, Err(AppError::NotFound)));
        assert_eq!(persistence.access_logs.count(None).await.unwrap(), 1);
        assert!(matches!(manager.delete(grace.id).await, Err(AppError::NotFound)));
    }
}
