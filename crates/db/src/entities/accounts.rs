//! `SeaORM` Entity for accounts table.

use caja_core::ledger::AccountInfo;
use caja_shared::types::{AccountId, UserId, money::from_minor_units};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::parse_currency;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub institution: Option<String>,
    pub currency: String,
    pub initial_balance_minor: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Opening balance, if one was set.
    #[must_use]
    pub fn initial_balance(&self) -> Option<Decimal> {
        self.initial_balance_minor.map(from_minor_units)
    }

    /// The facts movement validation needs about this account.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if the stored currency is unknown.
    pub fn info(&self) -> Result<AccountInfo, DbErr> {
        Ok(AccountInfo {
            id: AccountId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            currency: parse_currency(&self.currency)?,
            initial_balance: self.initial_balance(),
            deleted: self.deleted_at.is_some(),
        })
    }
}
