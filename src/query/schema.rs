//! Field descriptors that whitelist what a query may touch.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A typed field value, as compared by predicates and orderings.
#[derive(Debug, Clone, PartialEq, PartialOrd, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

/// Storage kind of a field, used to parse query string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    Timestamp,
}

impl FieldKind {
    /// Parse a raw query string value into a typed value.
    ///
    /// Returns `None` when the text does not fit the kind.
    pub fn parse(self, raw: &str) -> Option<Value> {
        match self {
            FieldKind::Text => Some(Value::Text(raw.to_string())),
            FieldKind::Integer => raw.trim().parse::<i64>().ok().map(Value::Integer),
            FieldKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Value::Boolean(true)),
                "false" | "0" => Some(Value::Boolean(false)),
                _ => None,
            },
            FieldKind::Timestamp => DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|ts| Value::Timestamp(ts.with_timezone(&Utc))),
        }
    }
}

/// A queryable field of an entity, by its public (API) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// The set of fields a list query may filter, search and sort on.
///
/// Fields missing from the schema (password hashes, verification codes)
/// can never be reached from a query string.
#[derive(Debug)]
pub struct Schema {
    pub fields: &'static [FieldDef],
    pub default_sort: &'static str,
}

impl Schema {
    /// Look up a field by its public name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Whether the schema knows a field by this name.
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// Anything that can expose field values by name: stored records as well as
/// create/update payloads checked by the uniqueness guard.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<Value>;
}

impl FieldSource for () {
    fn field(&self, _name: &str) -> Option<Value> {
        None
    }
}
