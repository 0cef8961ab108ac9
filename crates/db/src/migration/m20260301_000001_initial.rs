//! Initial database migration.
//!
//! Creates accounts, categories, and the three movement tables. Amounts are
//! stored in minor units; every table carries `user_id` and `deleted_at`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Name,
    Institution,
    Currency,
    InitialBalanceMinor,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden, Clone, Copy)]
enum Incomes {
    Table,
}

#[derive(Iden, Clone, Copy)]
enum Expenses {
    Table,
}

/// Columns shared by `incomes` and `expenses`.
#[derive(Iden)]
enum Movement {
    Id,
    UserId,
    Kind,
    AccountId,
    CategoryId,
    AmountMinor,
    Currency,
    Date,
    Note,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Transfers {
    Table,
    Id,
    UserId,
    FromKind,
    FromAccountId,
    ToKind,
    ToAccountId,
    AmountMinor,
    Currency,
    Date,
    Note,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // ACCOUNTS & CATEGORIES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Accounts::Name).string())
                    .col(ColumnDef::new(Accounts::Institution).string())
                    .col(ColumnDef::new(Accounts::Currency).string_len(3).not_null())
                    .col(ColumnDef::new(Accounts::InitialBalanceMinor).big_integer())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Accounts::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::UserId).uuid().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Categories::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // INCOMES & EXPENSES
        // ============================================================
        manager.create_table(movement_table(Incomes::Table, "incomes")).await?;
        manager.create_table(movement_table(Expenses::Table, "expenses")).await?;

        // ============================================================
        // TRANSFERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Transfers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Transfers::UserId).uuid().not_null())
                    .col(ColumnDef::new(Transfers::FromKind).string_len(16).not_null())
                    .col(ColumnDef::new(Transfers::FromAccountId).uuid())
                    .col(ColumnDef::new(Transfers::ToKind).string_len(16).not_null())
                    .col(ColumnDef::new(Transfers::ToAccountId).uuid())
                    .col(ColumnDef::new(Transfers::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Transfers::Currency).string_len(3).not_null())
                    .col(ColumnDef::new(Transfers::Date).date())
                    .col(ColumnDef::new(Transfers::Note).text())
                    .col(
                        ColumnDef::new(Transfers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transfers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transfers::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transfers-from_account_id")
                            .from(Transfers::Table, Transfers::FromAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transfers-to_account_id")
                            .from(Transfers::Table, Transfers::ToAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

/// Schema of `incomes` and `expenses`, which differ only by name.
fn movement_table<T>(table: T, name: &str) -> TableCreateStatement
where
    T: Iden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(Movement::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Movement::UserId).uuid().not_null())
        .col(ColumnDef::new(Movement::Kind).string_len(16).not_null())
        .col(ColumnDef::new(Movement::AccountId).uuid())
        .col(ColumnDef::new(Movement::CategoryId).uuid())
        .col(ColumnDef::new(Movement::AmountMinor).big_integer().not_null())
        .col(ColumnDef::new(Movement::Currency).string_len(3).not_null())
        .col(ColumnDef::new(Movement::Date).date())
        .col(ColumnDef::new(Movement::Note).text())
        .col(
            ColumnDef::new(Movement::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Movement::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Movement::DeletedAt).timestamp_with_time_zone())
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk-{name}-account_id"))
                .from(table, Movement::AccountId)
                .to(Accounts::Table, Accounts::Id),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk-{name}-category_id"))
                .from(table, Movement::CategoryId)
                .to(Categories::Table, Categories::Id),
        )
        .to_owned()
}
