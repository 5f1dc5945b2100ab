//! Password reset database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};

use crate::domain::{ForgotPassword, ForgotPasswordPatch, NewForgotPassword};
use crate::infra::repositories::sea_store::SeaRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "forgot_passwords")]
pub struct Model {
    #[sea_orm(primary_key)]
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
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ForgotPassword {
    fn from(model: Model) -> Self {
        ForgotPassword {
            id: model.id,
            email: model.email,
            verification: model.verification,
            used: model.used,
            ip_request: model.ip_request,
            browser_request: model.browser_request,
            country_request: model.country_request,
            ip_changed: model.ip_changed,
            browser_changed: model.browser_changed,
            country_changed: model.country_changed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl SeaRecord for ForgotPassword {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn column(field: &str) -> Option<Column> {
        Some(match field {
            "id" => Column::Id,
            "email" => Column::Email,
            "verification" => Column::Verification,
            "used" => Column::Used,
            "createdAt" => Column::CreatedAt,
            "updatedAt" => Column::UpdatedAt,
            _ => return None,
        })
    }

    fn from_model(model: Model) -> Self {
        model.into()
    }

    fn insert_model(new: NewForgotPassword, now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            email: Set(new.email),
            verification: Set(Some(new.verification)),
            used: Set(false),
            ip_request: Set(Some(new.requested_by.ip)),
            browser_request: Set(Some(new.requested_by.browser)),
            country_request: Set(Some(new.requested_by.country)),
            ip_changed: Set(None),
            browser_changed: Set(None),
            country_changed: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    fn update_model(id: i32, patch: ForgotPasswordPatch, now: DateTimeUtc) -> ActiveModel {
        let mut model = ActiveModel {
            id: Set(id),
            used: patch.used.map_or(NotSet, Set),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(client) = patch.changed_by {
            model.ip_changed = Set(Some(client.ip));
            model.browser_changed = Set(Some(client.browser));
            model.country_changed = Set(Some(client.country));
        }
        model
    }
}
