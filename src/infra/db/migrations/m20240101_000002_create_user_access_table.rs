//! Migration: Create user_access table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAccess::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserAccess::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserAccess::Email).string_len(255).not_null())
                    .col(ColumnDef::new(UserAccess::Ip).text().not_null())
                    .col(ColumnDef::new(UserAccess::Browser).text().not_null())
                    .col(ColumnDef::new(UserAccess::Country).text().not_null())
                    .col(
                        ColumnDef::new(UserAccess::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserAccess::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Account deletion removes entries by email
        manager
            .create_index(
                Index::create()
                    .name("idx_user_access_email")
                    .table(UserAccess::Table)
                    .col(UserAccess::Email)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserAccess::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserAccess {
    Table,
    Id,
    Email,
    Ip,
    Browser,
    Country,
    CreatedAt,
    UpdatedAt,
}
