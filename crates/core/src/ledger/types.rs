//! Input and resolved types for movement validation.

use std::str::FromStr;

use caja_shared::types::{AccountId, CategoryId, Currency, UserId, money::to_minor_units};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::pool::Pool;

/// An amount as it arrives from a client, before strict parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// Already a decimal.
    Decimal(Decimal),
    /// Free text such as `"12.50"`.
    Text(String),
}

impl RawAmount {
    /// Parses into a non-negative amount with at most two decimals.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` when the text is not a number,
    /// the value is negative, or it carries more than two decimals.
    pub fn parse(&self) -> Result<Decimal, LedgerError> {
        let amount = match self {
            Self::Decimal(value) => *value,
            Self::Text(text) => Decimal::from_str(text.trim())
                .map_err(|_| LedgerError::InvalidAmount(format!("'{text}' is not a number")))?,
        };

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(LedgerError::InvalidAmount(format!(
                "{amount} must not be negative"
            )));
        }
        if to_minor_units(amount).is_none() {
            return Err(LedgerError::InvalidAmount(format!(
                "{amount} is not a two-decimal amount"
            )));
        }

        let mut amount = amount.abs();
        amount.rescale(2);
        Ok(amount)
    }
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Which side of the ledger a category may be used on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Categorizes incomes.
    Income,
    /// Categorizes expenses.
    Expense,
}

impl CategoryKind {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown category kind '{other}'")),
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account facts needed by validation and balance computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// Owner of the account.
    pub user_id: UserId,
    /// The account's currency.
    pub currency: Currency,
    /// Opening balance, in the account's currency.
    pub initial_balance: Option<Decimal>,
    /// Whether the account has been soft-deleted.
    pub deleted: bool,
}

/// Category facts needed by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    /// The category ID.
    pub id: CategoryId,
    /// Owner of the category.
    pub user_id: UserId,
    /// Income or expense.
    pub kind: CategoryKind,
    /// Whether the category has been soft-deleted.
    pub deleted: bool,
}

/// An income or expense as submitted.
#[derive(Debug, Clone)]
pub struct MovementDraft {
    /// Pool credited (income) or debited (expense).
    pub pool: Pool,
    /// Unparsed amount.
    pub amount: RawAmount,
    /// Client currency code; ignored when `pool` is a bank account.
    pub currency: Option<String>,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Movement date.
    pub date: Option<NaiveDate>,
    /// Free-form note.
    pub note: Option<String>,
}

/// A transfer as submitted.
#[derive(Debug, Clone)]
pub struct TransferDraft {
    /// Pool debited.
    pub from: Pool,
    /// Pool credited.
    pub to: Pool,
    /// Unparsed amount.
    pub amount: RawAmount,
    /// Client currency code; ignored when either side is a bank account.
    pub currency: Option<String>,
    /// Transfer date.
    pub date: Option<NaiveDate>,
    /// Free-form note.
    pub note: Option<String>,
}

/// An income or expense that passed reference and currency checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMovement {
    /// Target pool.
    pub pool: Pool,
    /// Parsed amount.
    pub amount: Decimal,
    /// Effective currency.
    pub currency: Currency,
    /// Validated category.
    pub category_id: Option<CategoryId>,
    /// Movement date.
    pub date: Option<NaiveDate>,
    /// Free-form note.
    pub note: Option<String>,
}

/// A transfer that passed reference, currency, and distinct-pool checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTransfer {
    /// Pool debited.
    pub from: Pool,
    /// Pool credited.
    pub to: Pool,
    /// Parsed amount.
    pub amount: Decimal,
    /// Effective currency.
    pub currency: Currency,
    /// Transfer date.
    pub date: Option<NaiveDate>,
    /// Free-form note.
    pub note: Option<String>,
}

/// The debit a movement made before it was edited.
///
/// Its amount is credited back to the balance when the edit keeps the same
/// source pool and currency. A transfer that also credited the pool it now
/// draws from has that credit taken out instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorDebit {
    /// Source pool before the edit.
    pub pool: Pool,
    /// Pool credited before the edit. Set for transfers only.
    pub credited: Option<Pool>,
    /// Currency before the edit.
    pub currency: Currency,
    /// Amount before the edit.
    pub amount: Decimal,
}
