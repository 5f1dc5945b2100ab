//! Migration: Create forgot_passwords table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ForgotPasswords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForgotPasswords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForgotPasswords::Email).string_len(255).not_null())
                    .col(ColumnDef::new(ForgotPasswords::Verification).string_len(255).null())
                    .col(
                        ColumnDef::new(ForgotPasswords::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ForgotPasswords::IpRequest).text().null())
                    .col(ColumnDef::new(ForgotPasswords::BrowserRequest).text().null())
                    .col(ColumnDef::new(ForgotPasswords::CountryRequest).text().null())
                    .col(ColumnDef::new(ForgotPasswords::IpChanged).text().null())
                    .col(ColumnDef::new(ForgotPasswords::BrowserChanged).text().null())
                    .col(ColumnDef::new(ForgotPasswords::CountryChanged).text().null())
                    .col(
                        ColumnDef::new(ForgotPasswords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ForgotPasswords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ForgotPasswords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ForgotPasswords {
    Table,
    Id,
    Email,
    Verification,
    Used,
    IpRequest,
    BrowserRequest,
    CountryRequest,
    IpChanged,
    BrowserChanged,
    CountryChanged,
    CreatedAt,
    UpdatedAt,
}
