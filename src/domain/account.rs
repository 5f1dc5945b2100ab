//! Account domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{
    DEFAULT_SORT_FIELD, MAX_LOGIN_ATTEMPTS, ROLE_ADMIN, ROLE_AGENT, ROLE_DEVELOPER, ROLE_OWNER,
    ROLE_SUPERADMIN, ROLE_USER,
};
use crate::errors::AppError;
use crate::query::{FieldDef, FieldKind, FieldSource, Schema, Value};

use super::record::{opt_text, opt_timestamp, set, text, Record};

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    #[default]
    User,
    Admin,
    Superadmin,
    Developer,
    Agent,
    Owner,
}

impl AccountRole {
    /// Whether this role may manage other accounts
    pub fn is_admin(&self) -> bool {
        matches!(self, AccountRole::Admin | AccountRole::Superadmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::User => ROLE_USER,
            AccountRole::Admin => ROLE_ADMIN,
            AccountRole::Superadmin => ROLE_SUPERADMIN,
            AccountRole::Developer => ROLE_DEVELOPER,
            AccountRole::Agent => ROLE_AGENT,
            AccountRole::Owner => ROLE_OWNER,
        }
    }
}

impl FromStr for AccountRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(AccountRole::User),
            ROLE_ADMIN => Ok(AccountRole::Admin),
            ROLE_SUPERADMIN => Ok(AccountRole::Superadmin),
            ROLE_DEVELOPER => Ok(AccountRole::Developer),
            ROLE_AGENT => Ok(AccountRole::Agent),
            ROLE_OWNER => Ok(AccountRole::Owner),
            other => Err(AppError::validation(format!("Unknown role: {}", other))),
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account domain entity.
///
/// The password hash and verification code never leave the process.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Always stored lowercase
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: AccountRole,
    #[serde(skip)]
    pub verification: Option<String>,
    pub verified: bool,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub url_twitter: Option<String>,
    pub url_github: Option<String>,
    pub login_attempts: i32,
    pub block_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Display name: first and last name joined
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }

    /// A block is active while its expiry lies in the future.
    pub fn is_blocked(&self, now: DateTime<Utc>) -> bool {
        self.block_expires.is_some_and(|expires| expires > now)
    }

    /// The account went over the attempt threshold but its block has lapsed,
    /// so the counter is due for a reset.
    pub fn block_has_expired(&self, now: DateTime<Utc>) -> bool {
        self.login_attempts > MAX_LOGIN_ATTEMPTS && !self.is_blocked(now)
    }
}

static ACCOUNT_SCHEMA: Schema = Schema {
    fields: &[
        FieldDef::new("id", FieldKind::Integer),
        FieldDef::new("firstName", FieldKind::Text),
        FieldDef::new("lastName", FieldKind::Text),
        FieldDef::new("email", FieldKind::Text),
        FieldDef::new("role", FieldKind::Text),
        FieldDef::new("verified", FieldKind::Boolean),
        FieldDef::new("phone", FieldKind::Text),
        FieldDef::new("city", FieldKind::Text),
        FieldDef::new("country", FieldKind::Text),
        FieldDef::new("urlTwitter", FieldKind::Text),
        FieldDef::new("urlGithub", FieldKind::Text),
        FieldDef::new("loginAttempts", FieldKind::Integer),
        FieldDef::new("blockExpires", FieldKind::Timestamp),
        FieldDef::new("createdAt", FieldKind::Timestamp),
        FieldDef::new("updatedAt", FieldKind::Timestamp),
    ],
    default_sort: DEFAULT_SORT_FIELD,
};

impl FieldSource for Account {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "firstName" => text(&self.first_name),
            "lastName" => opt_text(&self.last_name),
            "email" => text(&self.email),
            "password" => text(&self.password_hash),
            "role" => text(self.role.as_str()),
            "verification" => opt_text(&self.verification),
            "verified" => Some(self.verified.into()),
            "phone" => opt_text(&self.phone),
            "city" => opt_text(&self.city),
            "country" => opt_text(&self.country),
            "urlTwitter" => opt_text(&self.url_twitter),
            "urlGithub" => opt_text(&self.url_github),
            "loginAttempts" => Some(self.login_attempts.into()),
            "blockExpires" => opt_timestamp(&self.block_expires),
            "createdAt" => Some(self.created_at.into()),
            "updatedAt" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

impl Record for Account {
    type New = NewAccount;
    type Patch = AccountPatch;

    const NAME: &'static str = "Account";

    fn schema() -> &'static Schema {
        &ACCOUNT_SCHEMA
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn from_new(id: i32, new: NewAccount, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            verification: new.verification,
            verified: new.verified,
            phone: new.phone,
            city: new.city,
            country: new.country,
            url_twitter: new.url_twitter,
            url_github: new.url_github,
            login_attempts: 0,
            block_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: AccountPatch, now: DateTime<Utc>) {
        set(&mut self.first_name, patch.first_name);
        set(&mut self.last_name, patch.last_name);
        set(&mut self.email, patch.email);
        set(&mut self.password_hash, patch.password_hash);
        set(&mut self.role, patch.role);
        set(&mut self.verification, patch.verification);
        set(&mut self.verified, patch.verified);
        set(&mut self.phone, patch.phone);
        set(&mut self.city, patch.city);
        set(&mut self.country, patch.country);
        set(&mut self.url_twitter, patch.url_twitter);
        set(&mut self.url_github, patch.url_github);
        set(&mut self.login_attempts, patch.login_attempts);
        set(&mut self.block_expires, patch.block_expires);
        self.updated_at = now;
    }
}

/// Insert payload for an account. The password is already hashed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: AccountRole,
    pub verification: Option<String>,
    pub verified: bool,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub url_twitter: Option<String>,
    pub url_github: Option<String>,
}

impl FieldSource for NewAccount {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "firstName" => text(&self.first_name),
            "email" => text(&self.email),
            "role" => text(self.role.as_str()),
            _ => None,
        }
    }
}

/// Partial update of an account.
///
/// `None` leaves a column untouched; for nullable columns `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch {
    pub first_name: Option<String>,
    pub last_name: Option<Option<String>>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<AccountRole>,
    pub verification: Option<Option<String>>,
    pub verified: Option<bool>,
    pub phone: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub country: Option<Option<String>>,
    pub url_twitter: Option<Option<String>>,
    pub url_github: Option<Option<String>>,
    pub login_attempts: Option<i32>,
    pub block_expires: Option<Option<DateTime<Utc>>>,
}

impl AccountPatch {
    /// Reset the failed login counter
    pub fn reset_attempts() -> Self {
        Self {
            login_attempts: Some(0),
            ..Default::default()
        }
    }

    /// Block logins until the given instant
    pub fn block_until(expires: DateTime<Utc>) -> Self {
        Self {
            block_expires: Some(Some(expires)),
            ..Default::default()
        }
    }
}

impl FieldSource for AccountPatch {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "firstName" => self.first_name.as_deref().and_then(text),
            "email" => self.email.as_deref().and_then(text),
            "role" => self.role.as_ref().and_then(|role| text(role.as_str())),
            _ => None,
        }
    }
}

/// Public account info returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AccountInfo {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    #[schema(example = "user")]
    pub role: AccountRole,
    pub verified: bool,
    /// Only present outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
}

impl AccountInfo {
    /// Build the public view; the verification code is only copied when asked.
    pub fn from_account(account: &Account, include_verification: bool) -> Self {
        Self {
            id: account.id,
            name: account.full_name(),
            email: account.email.clone(),
            role: account.role,
            verified: account.verified,
            verification: account
                .verification
                .clone()
                .filter(|_| include_verification),
        }
    }
}
