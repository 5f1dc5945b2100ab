//! Bot entity, the example resource managed through the generic CRUD helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::config::DEFAULT_SORT_FIELD;
use crate::query::{FieldDef, FieldKind, FieldSource, Schema, Value};

use super::record::{opt_text, set, text, Record};

/// Bot names are unique
pub const BOT_UNIQUE_FIELDS: &[&str] = &["name"];

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "My Awesome Bot")]
    pub name: String,
    #[schema(example = "This bot is designed to do awesome things.")]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Bot creation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBot {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "My Awesome Bot")]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    #[schema(example = "This bot is designed to do awesome things.")]
    pub description: Option<String>,
    /// Defaults to true
    pub is_active: Option<bool>,
}

/// Partial bot update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BotPatch {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

static BOT_SCHEMA: Schema = Schema {
    fields: &[
        FieldDef::new("id", FieldKind::Integer),
        FieldDef::new("name", FieldKind::Text),
        FieldDef::new("description", FieldKind::Text),
        FieldDef::new("isActive", FieldKind::Boolean),
        FieldDef::new("createdAt", FieldKind::Timestamp),
        FieldDef::new("updatedAt", FieldKind::Timestamp),
    ],
    default_sort: DEFAULT_SORT_FIELD,
};

impl FieldSource for Bot {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "name" => text(&self.name),
            "description" => opt_text(&self.description),
            "isActive" => Some(self.is_active.into()),
            "createdAt" => Some(self.created_at.into()),
            "updatedAt" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

impl FieldSource for NewBot {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => text(&self.name),
            "description" => opt_text(&self.description),
            "isActive" => self.is_active.map(Value::from),
            _ => None,
        }
    }
}

impl FieldSource for BotPatch {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => opt_text(&self.name),
            "description" => opt_text(&self.description),
            "isActive" => self.is_active.map(Value::from),
            _ => None,
        }
    }
}

impl Record for Bot {
    type New = NewBot;
    type Patch = BotPatch;

    const NAME: &'static str = "Bot";

    fn schema() -> &'static Schema {
        &BOT_SCHEMA
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn from_new(id: i32, new: NewBot, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            is_active: new.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: BotPatch, now: DateTime<Utc>) {
        set(&mut self.name, patch.name);
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        set(&mut self.is_active, patch.is_active);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bot_is_active_by_default() {
        let bot = Bot::from_new(
            1,
            NewBot {
                name: "Helper".into(),
                description: None,
                is_active: None,
            },
            Utc::now(),
        );
        assert!(bot.is_active);
    }

    #[test]
    fn test_patch_field_source_exposes_only_present_fields() {
        let patch = BotPatch {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(patch.field("name"), None);
        assert_eq!(patch.field("isActive"), Some(Value::Boolean(false)));
    }

    #[test]
    fn test_deserializes_camel_case() {
        let new: NewBot =
            serde_json::from_value(serde_json::json!({"name": "B", "isActive": false})).unwrap();
        assert_eq!(new.is_active, Some(false));
    }
}
