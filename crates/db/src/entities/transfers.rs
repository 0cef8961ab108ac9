//! `SeaORM` Entity for transfers table.

use caja_core::ledger::{LedgerRow, Pool, PriorDebit};
use caja_core::reports::TransferRecord;
use caja_shared::types::{Currency, money::from_minor_units};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{parse_currency, parse_pool};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub from_kind: String,
    pub from_account_id: Option<Uuid>,
    pub to_kind: String,
    pub to_account_id: Option<Uuid>,
    pub amount_minor: i64,
    pub currency: String,
    pub date: Option<Date>,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::FromAccountId",
        to = "super::accounts::Column::Id"
    )]
    FromAccount,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::ToAccountId",
        to = "super::accounts::Column::Id"
    )]
    ToAccount,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Amount with two decimals.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        from_minor_units(self.amount_minor)
    }

    /// The pool debited.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if `from_kind` and `from_account_id` disagree.
    pub fn from_pool(&self) -> Result<Pool, DbErr> {
        parse_pool(&self.from_kind, self.from_account_id)
    }

    /// The pool credited.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if `to_kind` and `to_account_id` disagree.
    pub fn to_pool(&self) -> Result<Pool, DbErr> {
        parse_pool(&self.to_kind, self.to_account_id)
    }

    /// Stored currency.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if the stored currency is unknown.
    pub fn currency(&self) -> Result<Currency, DbErr> {
        parse_currency(&self.currency)
    }

    /// The row as seen from either of its pools.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if the stored currency is unknown.
    pub fn ledger_row(&self) -> Result<LedgerRow, DbErr> {
        Ok(LedgerRow {
            id: self.id,
            amount: self.amount(),
            currency: self.currency()?,
            date: self.date,
        })
    }

    /// The row as the report engine consumes it.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if a stored pool or the currency is inconsistent.
    pub fn record(&self) -> Result<TransferRecord, DbErr> {
        Ok(TransferRecord {
            from: self.from_pool()?,
            to: self.to_pool()?,
            amount: self.amount(),
            currency: self.currency()?,
            date: self.date,
        })
    }

    /// What this transfer took from its source and paid into its destination,
    /// for the funds check of an edit.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if a stored pool or the currency is inconsistent.
    pub fn prior_debit(&self) -> Result<PriorDebit, DbErr> {
        Ok(PriorDebit {
            pool: self.from_pool()?,
            credited: Some(self.to_pool()?),
            currency: self.currency()?,
            amount: self.amount(),
        })
    }
}
