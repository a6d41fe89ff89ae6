use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string(Accounts::Name).unique_key())
                    .col(string(Accounts::Role).string_len(20))
                    .col(decimal(Accounts::Balance).decimal_len(16, 4).default(0))
                    .col(integer(Accounts::Version).default(0))
                    .col(timestamp_with_time_zone(Accounts::CreatedAt))
                    .check(Expr::col(Accounts::Balance).gte(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_role")
                    .table(Accounts::Table)
                    .col(Accounts::Role)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Name,
    Role,
    Balance,
    Version,
    CreatedAt,
}
