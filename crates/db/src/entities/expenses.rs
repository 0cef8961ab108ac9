//! `SeaORM` Entity for expenses table.

use caja_core::ledger::{LedgerRow, Pool, PriorDebit};
use caja_core::reports::MovementRecord;
use caja_shared::types::{Currency, money::from_minor_units};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{parse_currency, parse_pool};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
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
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
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
    /// Returns `DbErr::Type` if `kind` and `account_id` disagree.
    pub fn pool(&self) -> Result<Pool, DbErr> {
        parse_pool(&self.kind, self.account_id)
    }

    /// Stored currency.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if the stored currency is unknown.
    pub fn currency(&self) -> Result<Currency, DbErr> {
        parse_currency(&self.currency)
    }

    /// The row as seen from its pool.
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
    /// Returns `DbErr::Type` if the stored pool or currency is inconsistent.
    pub fn record(&self) -> Result<MovementRecord, DbErr> {
        Ok(MovementRecord {
            pool: self.pool()?,
            amount: self.amount(),
            currency: self.currency()?,
            date: self.date,
        })
    }

    /// What this expense took from its pool, for the funds check of an edit.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if the stored pool or currency is inconsistent.
    pub fn prior_debit(&self) -> Result<PriorDebit, DbErr> {
        Ok(PriorDebit {
            pool: self.pool()?,
            credited: None,
            currency: self.currency()?,
            amount: self.amount(),
        })
    }
}
