//! Ledger rows as read back for one pool and currency.

use caja_shared::types::Currency;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One movement as seen from a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Id of the income, expense, or transfer.
    pub id: Uuid,
    /// Amount, always non-negative.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Date of the movement, if the user gave one.
    pub date: Option<NaiveDate>,
}

/// Every live movement touching one pool in one currency.
///
/// A transfer shows up in `transfers_out` when the pool is its source and in
/// `transfers_in` when the pool is its destination, never in both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Incomes credited to the pool.
    pub incomes: Vec<LedgerRow>,
    /// Expenses debited from the pool.
    pub expenses: Vec<LedgerRow>,
    /// Transfers leaving the pool.
    pub transfers_out: Vec<LedgerRow>,
    /// Transfers arriving at the pool.
    pub transfers_in: Vec<LedgerRow>,
}

impl Ledger {
    /// Returns true if no movement touches the pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incomes.is_empty()
            && self.expenses.is_empty()
            && self.transfers_out.is_empty()
            && self.transfers_in.is_empty()
    }

    /// Number of rows across all four streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incomes.len() + self.expenses.len() + self.transfers_out.len() + self.transfers_in.len()
    }
}

/// Sums the amounts of a row stream.
#[must_use]
pub fn sum_rows(rows: &[LedgerRow]) -> Decimal {
    rows.iter().map(|row| row.amount).sum()
}
