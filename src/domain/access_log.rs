//! Record of a successful authentication.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::DEFAULT_SORT_FIELD;
use crate::query::{FieldDef, FieldKind, FieldSource, Schema, Value};

use super::record::{text, Record};

/// Where a sign-in came from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientInfo {
    pub ip: String,
    pub browser: String,
    /// Two-letter country code, `XX` when unknown
    pub country: String,
}

/// One successful login or token refresh
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessLog {
    pub id: i32,
    pub email: String,
    pub ip: String,
    pub browser: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccessLog {
    pub email: String,
    pub client: ClientInfo,
}

static ACCESS_LOG_SCHEMA: Schema = Schema {
    fields: &[
        FieldDef::new("id", FieldKind::Integer),
        FieldDef::new("email", FieldKind::Text),
        FieldDef::new("ip", FieldKind::Text),
        FieldDef::new("browser", FieldKind::Text),
        FieldDef::new("country", FieldKind::Text),
        FieldDef::new("createdAt", FieldKind::Timestamp),
    ],
    default_sort: DEFAULT_SORT_FIELD,
};

impl FieldSource for AccessLog {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "email" => text(&self.email),
            "ip" => text(&self.ip),
            "browser" => text(&self.browser),
            "country" => text(&self.country),
            "createdAt" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

impl FieldSource for NewAccessLog {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "email" => text(&self.email),
            _ => None,
        }
    }
}

impl Record for AccessLog {
    type New = NewAccessLog;
    // Access log entries are append-only
    type Patch = ();

    const NAME: &'static str = "Access log";

    fn schema() -> &'static Schema {
        &ACCESS_LOG_SCHEMA
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn from_new(id: i32, new: NewAccessLog, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: new.email,
            ip: new.client.ip,
            browser: new.client.browser,
            country: new.client.country,
            created_at: now,
        }
    }

    fn apply(&mut self, _patch: (), _now: DateTime<Utc>) {}
}
