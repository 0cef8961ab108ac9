//! Indexes for the per-pool ledger reads and per-user listings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Accounts {
    Table,
    UserId,
}

#[derive(Iden)]
enum Categories {
    Table,
    UserId,
}

#[derive(Iden)]
enum Incomes {
    Table,
}

#[derive(Iden)]
enum Expenses {
    Table,
}

#[derive(Iden)]
enum Movement {
    UserId,
    AccountId,
    Currency,
    Date,
}

#[derive(Iden)]
enum Transfers {
    Table,
    UserId,
    FromAccountId,
    ToAccountId,
    Date,
}

const INDEXES: [&str; 9] = [
    "idx-accounts-user_id",
    "idx-categories-user_id",
    "idx-incomes-user_id-account_id-currency",
    "idx-incomes-user_id-date",
    "idx-expenses-user_id-account_id-currency",
    "idx-expenses-user_id-date",
    "idx-transfers-user_id-from_account_id",
    "idx-transfers-user_id-to_account_id",
    "idx-transfers-user_id-date",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name(INDEXES[0])
                    .table(Accounts::Table)
                    .col(Accounts::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name(INDEXES[1])
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .to_owned(),
            )
            .await?;

        for (table, pool_index, date_index) in [
            (Incomes::Table.into_iden(), INDEXES[2], INDEXES[3]),
            (Expenses::Table.into_iden(), INDEXES[4], INDEXES[5]),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(pool_index)
                        .table(table.clone())
                        .col(Movement::UserId)
                        .col(Movement::AccountId)
                        .col(Movement::Currency)
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .name(date_index)
                        .table(table)
                        .col(Movement::UserId)
                        .col(Movement::Date)
                        .to_owned(),
                )
                .await?;
        }

        for (name, column) in [
            (INDEXES[6], Transfers::FromAccountId),
            (INDEXES[7], Transfers::ToAccountId),
            (INDEXES[8], Transfers::Date),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Transfers::Table)
                        .col(Transfers::UserId)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let tables = [
            Accounts::Table.into_iden(),
            Categories::Table.into_iden(),
            Incomes::Table.into_iden(),
            Incomes::Table.into_iden(),
            Expenses::Table.into_iden(),
            Expenses::Table.into_iden(),
            Transfers::Table.into_iden(),
            Transfers::Table.into_iden(),
            Transfers::Table.into_iden(),
        ];
        for (name, table) in INDEXES.into_iter().zip(tables) {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
