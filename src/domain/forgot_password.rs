//! Password reset requests.

use chrono::{DateTime, Utc};

use crate::config::DEFAULT_SORT_FIELD;
use crate::query::{FieldDef, FieldKind, FieldSource, Schema, Value};

use super::access_log::ClientInfo;
use super::record::{opt_text, set, text, Record};

/// A pending or consumed password reset.
///
/// The verification code is single use: `used` flips once on reset.
#[derive(Debug, Clone, PartialEq)]
pub struct ForgotPassword {
    pub id: i32,
    pub email: String,
    pub verification: Option<String>,
    pub used: bool,
    pub ip_request: Option<String>,
    pub browser_request: Option<String>,
    pub country_request: Option<String>,
    pub ip_changed: Option<String>,
    pub browser_changed: Option<String>,
    pub country_changed: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewForgotPassword {
    pub email: String,
    pub verification: String,
    pub requested_by: ClientInfo,
}

/// Marks a reset as consumed from the given client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForgotPasswordPatch {
    pub used: Option<bool>,
    pub changed_by: Option<ClientInfo>,
}

impl ForgotPasswordPatch {
    pub fn consumed(client: ClientInfo) -> Self {
        Self {
            used: Some(true),
            changed_by: Some(client),
        }
    }
}

static FORGOT_PASSWORD_SCHEMA: Schema = Schema {
    fields: &[
        FieldDef::new("id", FieldKind::Integer),
        FieldDef::new("email", FieldKind::Text),
        FieldDef::new("used", FieldKind::Boolean),
        FieldDef::new("createdAt", FieldKind::Timestamp),
    ],
    default_sort: DEFAULT_SORT_FIELD,
};

impl FieldSource for ForgotPassword {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "email" => text(&self.email),
            "verification" => opt_text(&self.verification),
            "used" => Some(self.used.into()),
            "createdAt" => Some(self.created_at.into()),
            "updatedAt" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

impl FieldSource for NewForgotPassword {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "email" => text(&self.email),
            "verification" => text(&self.verification),
            _ => None,
        }
    }
}

impl FieldSource for ForgotPasswordPatch {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "used" => self.used.map(Value::from),
            _ => None,
        }
    }
}

impl Record for ForgotPassword {
    type New = NewForgotPassword;
    type Patch = ForgotPasswordPatch;

    const NAME: &'static str = "Password reset";

    fn schema() -> &'static Schema {
        &FORGOT_PASSWORD_SCHEMA
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn from_new(id: i32, new: NewForgotPassword, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: new.email,
            verification: Some(new.verification),
            used: false,
            ip_request: Some(new.requested_by.ip),
            browser_request: Some(new.requested_by.browser),
            country_request: Some(new.requested_by.country),
            ip_changed: None,
            browser_changed: None,
            country_changed: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: ForgotPasswordPatch, now: DateTime<Utc>) {
        set(&mut self.used, patch.used);
        if let Some(client) = patch.changed_by {
            self.ip_changed = Some(client.ip);
            self.browser_changed = Some(client.browser);
            self.country_changed = Some(client.country);
        }
        self.updated_at = now;
    }
}
