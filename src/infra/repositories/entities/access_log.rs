//! Access log database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};

use crate::domain::{AccessLog, NewAccessLog};
use crate::infra::repositories::sea_store::SeaRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_access")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub email: String,
    pub ip: String,
    pub browser: String,
    pub country: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AccessLog {
    fn from(model: Model) -> Self {
        AccessLog {
            id: model.id,
            email: model.email,
            ip: model.ip,
            browser: model.browser,
            country: model.country,
            created_at: model.created_at,
        }
    }
}

impl SeaRecord for AccessLog {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn column(field: &str) -> Option<Column> {
        Some(match field {
            "id" => Column::Id,
            "email" => Column::Email,
            "ip" => Column::Ip,
            "browser" => Column::Browser,
            "country" => Column::Country,
            "createdAt" => Column::CreatedAt,
            _ => return None,
        })
    }

    fn from_model(model: Model) -> Self {
        model.into()
    }

    fn insert_model(new: NewAccessLog, now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            email: Set(new.email),
            ip: Set(new.client.ip),
            browser: Set(new.client.browser),
            country: Set(new.client.country),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    fn update_model(id: i32, _patch: (), now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}
