use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::{account, balance_request};
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn account_fk(name: &str, column: balance_request::Column) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(BalanceRequest::table(), BalanceRequest::column(column))
        .to(Account::table(), Account::column(account::Column::Id))
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BalanceRequest::table())
                    .if_not_exists()
                    .col(pk_auto(BalanceRequest::column(balance_request::Column::Id)))
                    .col(integer(BalanceRequest::column(
                        balance_request::Column::RequesterId,
                    )))
                    .col(integer(BalanceRequest::column(
                        balance_request::Column::NominatedApproverId,
                    )))
                    .col(
                        decimal(BalanceRequest::column(balance_request::Column::Amount))
                            .decimal_len(16, 4),
                    )
                    .col(
                        string(BalanceRequest::column(balance_request::Column::Status))
                            .string_len(16)
                            .default("pending"),
                    )
                    .col(integer_null(BalanceRequest::column(
                        balance_request::Column::ApproverId,
                    )))
                    .col(timestamp_with_time_zone(BalanceRequest::column(
                        balance_request::Column::CreatedAt,
                    )))
                    .col(timestamp_with_time_zone_null(BalanceRequest::column(
                        balance_request::Column::ResolvedAt,
                    )))
                    .check(Expr::col(BalanceRequest::column(balance_request::Column::Amount)).gt(0))
                    .foreign_key(&mut account_fk(
                        "fk_balance_requests_requester",
                        balance_request::Column::RequesterId,
                    ))
                    .foreign_key(&mut account_fk(
                        "fk_balance_requests_nominated_approver",
                        balance_request::Column::NominatedApproverId,
                    ))
                    .foreign_key(&mut account_fk(
                        "fk_balance_requests_approver",
                        balance_request::Column::ApproverId,
                    ))
                    .to_owned(),
            )
            .await?;

        // Admins list their own requests, superadmins filter by status
        manager
            .create_index(
                Index::create()
                    .name("idx_balance_requests_requester")
                    .table(BalanceRequest::table())
                    .col(BalanceRequest::column(balance_request::Column::RequesterId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_balance_requests_status")
                    .table(BalanceRequest::table())
                    .col(BalanceRequest::column(balance_request::Column::Status))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BalanceRequest::table()).to_owned())
            .await
    }
}
