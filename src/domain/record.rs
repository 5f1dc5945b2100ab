//! Common shape of persisted entities.

use chrono::{DateTime, Utc};

use crate::query::{FieldSource, Schema, Value};

/// A persisted entity with a serial integer id.
///
/// `New` and `Patch` are the insert and partial-update payloads. Stores that
/// keep records in process build and mutate them through [`Record::from_new`]
/// and [`Record::apply`]; database stores map the same payloads to columns.
pub trait Record: FieldSource + Clone + Send + Sync + 'static {
    type New: FieldSource + Clone + Send + Sync + 'static;
    type Patch: FieldSource + Clone + Send + Sync + 'static;

    /// Human readable entity name, used in error messages.
    const NAME: &'static str;

    /// Fields reachable from list query strings.
    fn schema() -> &'static Schema;

    fn id(&self) -> i32;

    fn from_new(id: i32, new: Self::New, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

pub(crate) fn text(value: &str) -> Option<Value> {
    Some(Value::Text(value.to_string()))
}

pub(crate) fn opt_text(value: &Option<String>) -> Option<Value> {
    value.as_deref().and_then(text)
}

pub(crate) fn opt_timestamp(value: &Option<DateTime<Utc>>) -> Option<Value> {
    value.map(Value::Timestamp)
}

/// Overwrite `target` when the patch carries a value.
pub(crate) fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}
