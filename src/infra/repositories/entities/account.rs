//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};

use crate::domain::{Account, AccountPatch, NewAccount};
use crate::infra::repositories::sea_store::SeaRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string
    pub password: String,
    pub role: String,
    pub verification: Option<String>,
    pub verified: bool,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub url_twitter: Option<String>,
    pub url_github: Option<String>,
    pub login_attempts: i32,
    pub block_expires: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            password_hash: model.password,
            role: model.role.parse().unwrap_or_default(),
            verification: model.verification,
            verified: model.verified,
            phone: model.phone,
            city: model.city,
            country: model.country,
            url_twitter: model.url_twitter,
            url_github: model.url_github,
            login_attempts: model.login_attempts,
            block_expires: model.block_expires,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl SeaRecord for Account {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn column(field: &str) -> Option<Column> {
        Some(match field {
            "id" => Column::Id,
            "firstName" => Column::FirstName,
            "lastName" => Column::LastName,
            "email" => Column::Email,
            "password" => Column::Password,
            "role" => Column::Role,
            "verification" => Column::Verification,
            "verified" => Column::Verified,
            "phone" => Column::Phone,
            "city" => Column::City,
            "country" => Column::Country,
            "urlTwitter" => Column::UrlTwitter,
            "urlGithub" => Column::UrlGithub,
            "loginAttempts" => Column::LoginAttempts,
            "blockExpires" => Column::BlockExpires,
            "createdAt" => Column::CreatedAt,
            "updatedAt" => Column::UpdatedAt,
            _ => return None,
        })
    }

    fn from_model(model: Model) -> Self {
        model.into()
    }

    fn insert_model(new: NewAccount, now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            email: Set(new.email),
            password: Set(new.password_hash),
            role: Set(new.role.to_string()),
            verification: Set(new.verification),
            verified: Set(new.verified),
            phone: Set(new.phone),
            city: Set(new.city),
            country: Set(new.country),
            url_twitter: Set(new.url_twitter),
            url_github: Set(new.url_github),
            login_attempts: Set(0),
            block_expires: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    fn update_model(id: i32, patch: AccountPatch, now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            first_name: patch.first_name.map_or(NotSet, Set),
            last_name: patch.last_name.map_or(NotSet, Set),
            email: patch.email.map_or(NotSet, Set),
            password: patch.password_hash.map_or(NotSet, Set),
            role: patch.role.map_or(NotSet, |role| Set(role.to_string())),
            verification: patch.verification.map_or(NotSet, Set),
            verified: patch.verified.map_or(NotSet, Set),
            phone: patch.phone.map_or(NotSet, Set),
            city: patch.city.map_or(NotSet, Set),
            country: patch.country.map_or(NotSet, Set),
            url_twitter: patch.url_twitter.map_or(NotSet, Set),
            url_github: patch.url_github.map_or(NotSet, Set),
            login_attempts: patch.login_attempts.map_or(NotSet, Set),
            block_expires: patch.block_expires.map_or(NotSet, Set),
            created_at: NotSet,
            updated_at: Set(now),
        }
    }
}
