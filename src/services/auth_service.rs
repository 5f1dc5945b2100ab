//! Authentication service - Registration, login and account recovery.
//!
//! Login enforces the attempt-blocking policy: after more than
//! [`MAX_LOGIN_ATTEMPTS`] consecutive failures the account is blocked for
//! [`HOURS_TO_BLOCK`] hours. The block is re-evaluated lazily on the next
//! login, there is no background sweeper.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::crud::assert_unique;
use super::token::{AuthResponse, Claims, TokenIssuer, TokenResponse};
use crate::config::{
    Config, HOURS_TO_BLOCK, MAX_LOGIN_ATTEMPTS, MSG_PASSWORD_CHANGED, MSG_RESET_EMAIL_SENT,
};
use crate::domain::{
    Account, AccountInfo, AccountPatch, ClientInfo, ForgotPasswordPatch, NewAccessLog, NewAccount,
    NewForgotPassword, PasswordHasher,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Email, Mailer, Persistence};
use crate::query::Predicate;
use crate::types::MessageResponse;

/// Unique fields of an account
pub const ACCOUNT_UNIQUE_FIELDS: &[&str] = &["email"];

/// Self-service sign-up data
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Result of an email verification
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    pub verified: bool,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign it in
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse>;

    /// Check credentials and return a token
    async fn login(&self, email: &str, password: &str, client: ClientInfo)
        -> AppResult<AuthResponse>;

    /// Mark the account holding this verification code as verified
    async fn verify_email(&self, code: &str) -> AppResult<VerifyResponse>;

    /// Start a password reset
    async fn forgot_password(&self, email: &str, client: ClientInfo) -> AppResult<MessageResponse>;

    /// Consume a reset code and set a new password
    async fn reset_password(
        &self,
        code: &str,
        password: &str,
        client: ClientInfo,
    ) -> AppResult<MessageResponse>;

    /// Fresh token for an authenticated account
    async fn refresh_token(&self, account_id: i32, client: ClientInfo) -> AppResult<TokenResponse>;

    /// The authenticated account
    async fn me(&self, account_id: i32) -> AppResult<Account>;

    /// Verify a bearer token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService over the shared stores.
pub struct Authenticator {
    persistence: Persistence,
    hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn Mailer>,
    tokens: TokenIssuer,
    expose_verification: bool,
}

impl Authenticator {
    pub fn new(
        persistence: Persistence,
        hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn Mailer>,
        config: &Config,
    ) -> Self {
        Self {
            persistence,
            hasher,
            mailer,
            tokens: TokenIssuer::new(config),
            expose_verification: !config.is_production(),
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        self.persistence
            .accounts
            .find_one(&Predicate::Eq("email", email.into()))
            .await
    }

    fn auth_response(&self, account: &Account) -> AppResult<AuthResponse> {
        Ok(AuthResponse {
            token: self.tokens.issue(account)?,
            user: AccountInfo::from_account(account, self.expose_verification),
        })
    }

    async fn record_access(&self, account: &Account, client: ClientInfo) -> AppResult<()> {
        self.persistence
            .access_logs
            .insert(NewAccessLog {
                email: account.email.clone(),
                client,
            })
            .await?;
        Ok(())
    }

    /// Error for a wrong password; blocks the account once over the limit.
    async fn reject_password(&self, account: &Account, attempts: i32) -> AppError {
        if attempts <= MAX_LOGIN_ATTEMPTS {
            return AppError::InvalidCredentials;
        }

        let expires = Utc::now() + Duration::hours(HOURS_TO_BLOCK);
        match self
            .persistence
            .accounts
            .update(account.id, AccountPatch::block_until(expires))
            .await
        {
            Ok(_) => {
                tracing::warn!(
                    account_id = account.id,
                    %expires,
                    "Account blocked after failed logins"
                );
                AppError::Blocked
            }
            Err(e) => e,
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse> {
        let email = normalize_email(&registration.email);
        let new = NewAccount {
            first_name: registration.first_name,
            last_name: registration.last_name,
            email,
            verification: Some(Uuid::new_v4().to_string()),
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
            password_hash: self.hasher.hash(&registration.password)?,
            ..new
        };
        let account = self.persistence.accounts.insert(new).await?;
        tracing::info!(account_id = account.id, "Account registered");

        if let Some(code) = &account.verification {
            self.mailer
                .send(Email::verification(&account.email, &account.full_name(), code))
                .await?;
        }

        self.auth_response(&account)
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
        client: ClientInfo,
    ) -> AppResult<AuthResponse> {
        let accounts = &self.persistence.accounts;
        let account = self
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_not_found()?;

        let now = Utc::now();
        if account.is_blocked(now) {
            return Err(AppError::Blocked);
        }
        if account.block_has_expired(now) {
            accounts
                .update(account.id, AccountPatch::reset_attempts())
                .await?;
        }

        // The attempt is persisted before the password is checked.
        let attempts = accounts.increment_login_attempts(account.id).await?;

        if !self.hasher.verify(password, &account.password_hash) {
            return Err(self.reject_password(&account, attempts).await);
        }

        let account = accounts
            .update(account.id, AccountPatch::reset_attempts())
            .await?;
        self.record_access(&account, client).await?;
        tracing::info!(account_id = account.id, "Login succeeded");

        self.auth_response(&account)
    }

    async fn verify_email(&self, code: &str) -> AppResult<VerifyResponse> {
        let pending = Predicate::And(vec![
            Predicate::Eq("verification", code.into()),
            Predicate::Eq("verified", false.into()),
        ]);
        let account = self
            .persistence
            .accounts
            .find_one(&pending)
            .await?
            .ok_or_not_found()?;

        let patch = AccountPatch {
            verified: Some(true),
            ..Default::default()
        };
        let account = self.persistence.accounts.update(account.id, patch).await?;

        Ok(VerifyResponse {
            email: account.email,
            verified: account.verified,
        })
    }

    async fn forgot_password(&self, email: &str, client: ClientInfo) -> AppResult<MessageResponse> {
        let account = self
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_not_found()?;

        let code = Uuid::new_v4().to_string();
        self.persistence
            .forgot_passwords
            .insert(NewForgotPassword {
                email: account.email.clone(),
                verification: code.clone(),
                requested_by: client,
            })
            .await?;
        self.mailer
            .send(Email::password_reset(&account.email, &code))
            .await?;

        Ok(MessageResponse::with_verification(
            MSG_RESET_EMAIL_SENT,
            Some(code).filter(|_| self.expose_verification),
        ))
    }

    async fn reset_password(
        &self,
        code: &str,
        password: &str,
        client: ClientInfo,
    ) -> AppResult<MessageResponse> {
        let unused = Predicate::And(vec![
            Predicate::Eq("verification", code.into()),
            Predicate::Eq("used", false.into()),
        ]);
        let request = self
            .persistence
            .forgot_passwords
            .find_one(&unused)
            .await?
            .ok_or_not_found()?;
        let account = self
            .find_by_email(&request.email)
            .await?
            .ok_or_not_found()?;

        let patch = AccountPatch {
            password_hash: Some(self.hasher.hash(password)?),
            ..Default::default()
        };
        self.persistence.accounts.update(account.id, patch).await?;
        self.persistence
            .forgot_passwords
            .update(request.id, ForgotPasswordPatch::consumed(client))
            .await?;
        tracing::info!(account_id = account.id, "Password changed");

        Ok(MessageResponse::new(MSG_PASSWORD_CHANGED))
    }

    async fn refresh_token(&self, account_id: i32, client: ClientInfo) -> AppResult<TokenResponse> {
        let account = self.me(account_id).await?;
        self.record_access(&account, client).await?;

        Ok(TokenResponse {
            token: self.tokens.issue(&account)?,
        })
    }

    async fn me(&self, account_id: i32) -> AppResult<Account> {
        self.persistence
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_not_found()
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token)
    }
}
