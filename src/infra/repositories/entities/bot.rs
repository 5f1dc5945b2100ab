//! Bot database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};

use crate::domain::{Bot, BotPatch, NewBot};
use crate::infra::repositories::sea_store::SeaRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Bot {
    fn from(model: Model) -> Self {
        Bot {
            id: model.id,
            name: model.name,
            description: model.description,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl SeaRecord for Bot {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn column(field: &str) -> Option<Column> {
        Some(match field {
            "id" => Column::Id,
            "name" => Column::Name,
            "description" => Column::Description,
            "isActive" => Column::IsActive,
            "createdAt" => Column::CreatedAt,
            "updatedAt" => Column::UpdatedAt,
            _ => return None,
        })
    }

    fn from_model(model: Model) -> Self {
        model.into()
    }

    fn insert_model(new: NewBot, now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            name: Set(new.name),
            description: Set(new.description),
            is_active: Set(new.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    fn update_model(id: i32, patch: BotPatch, now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            name: patch.name.map_or(NotSet, Set),
            description: patch.description.map_or(NotSet, |d| Set(Some(d))),
            is_active: patch.is_active.map_or(NotSet, Set),
            created_at: NotSet,
            updated_at: Set(now),
        }
    }
}
