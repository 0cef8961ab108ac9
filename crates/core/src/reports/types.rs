//! Report data types.

use std::collections::BTreeMap;

use caja_shared::types::{AccountId, Currency};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{Pool, PoolKind};

/// Which movements a summary is built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Incomes only.
    Incomes,
    /// Expenses only.
    Expenses,
    /// Incomes, expenses, and transfers, netted per pool.
    #[default]
    Balance,
}

/// Restricts a summary to one kind of pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolFilter {
    /// Cash and bank accounts.
    #[default]
    All,
    /// Only the cash pool.
    Cash,
    /// Only bank accounts.
    Bank,
}

impl PoolFilter {
    /// Returns true if movements on `pool` pass the filter.
    #[must_use]
    pub const fn admits(self, pool: Pool) -> bool {
        self.admits_kind(pool.kind())
    }

    /// Returns true if pools of `kind` pass the filter.
    #[must_use]
    pub const fn admits_kind(self, kind: PoolKind) -> bool {
        match (self, kind) {
            (Self::All, _) | (Self::Cash, PoolKind::Cash) | (Self::Bank, PoolKind::Bank) => true,
            (Self::Cash, PoolKind::Bank) | (Self::Bank, PoolKind::Cash) => false,
        }
    }
}

/// Display order of the monthly series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthOrder {
    /// Oldest month first.
    #[default]
    Ascending,
    /// Newest month first.
    Descending,
}

/// Parameters of a summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    /// First day included, if bounded.
    pub from: Option<NaiveDate>,
    /// Last day included, if bounded.
    pub to: Option<NaiveDate>,
    /// Which movements to summarize.
    #[serde(default)]
    pub dataset: Dataset,
    /// Which pools to include.
    #[serde(default)]
    pub pool_filter: PoolFilter,
    /// Carry into the first month of the series, in local currency.
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Display order of the monthly series.
    #[serde(default)]
    pub order: MonthOrder,
}

impl ReportRequest {
    /// Returns true if neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns true if a movement dated `date` falls inside the range.
    ///
    /// Undated movements only fall inside an unbounded range.
    #[must_use]
    pub fn includes(&self, date: Option<NaiveDate>) -> bool {
        match date {
            None => self.is_unbounded(),
            Some(date) => {
                self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
            }
        }
    }
}

/// An income or expense handed to the report engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRecord {
    /// Pool credited or debited.
    pub pool: Pool,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Movement date.
    pub date: Option<NaiveDate>,
}

/// A transfer handed to the report engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    /// Pool debited.
    pub from: Pool,
    /// Pool credited.
    pub to: Pool,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Transfer date.
    pub date: Option<NaiveDate>,
}

/// A live account handed to the report engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    /// Account ID.
    pub id: AccountId,
    /// Display name.
    pub name: Option<String>,
    /// Bank or institution.
    pub institution: Option<String>,
    /// Account currency.
    pub currency: Currency,
    /// Opening balance.
    pub initial_balance: Option<Decimal>,
}

/// Everything a summary is computed from.
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    /// Live incomes of the user.
    pub incomes: Vec<MovementRecord>,
    /// Live expenses of the user.
    pub expenses: Vec<MovementRecord>,
    /// Live transfers of the user.
    pub transfers: Vec<TransferRecord>,
    /// Live accounts of the user.
    pub accounts: Vec<AccountSnapshot>,
}

/// Calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Month {
    /// Year.
    pub year: i32,
    /// Month, 1 to 12.
    pub month: u32,
}

impl Month {
    /// The month a date falls in.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Totals per pool kind, in local currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolKindTotals {
    /// `bank + cash`.
    pub total: Decimal,
    /// Bank accounts.
    pub bank: Decimal,
    /// Cash pool.
    pub cash: Decimal,
}

/// One month of the series, amounts in local currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// The month.
    pub month: Month,
    /// Incomes in the month.
    pub incomes: Decimal,
    /// Expenses in the month.
    pub expenses: Decimal,
    /// Carry from the previous month.
    pub carry_in: Decimal,
    /// `carry_in + incomes - expenses`.
    pub carry_out: Decimal,
}

/// Per-account line of a balance summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account ID.
    pub id: AccountId,
    /// Display name.
    pub name: Option<String>,
    /// Bank or institution.
    pub institution: Option<String>,
    /// Account currency.
    pub currency: Currency,
    /// Opening balance.
    pub initial_balance: Decimal,
    /// Incomes in range.
    pub incomes: Decimal,
    /// Expenses in range.
    pub expenses: Decimal,
    /// Transfers received in range.
    pub transfers_in: Decimal,
    /// Transfers sent in range.
    pub transfers_out: Decimal,
    /// Balance in the account's currency.
    pub balance: Decimal,
    /// Balance in local currency.
    pub balance_local: Decimal,
    /// Balance in foreign currency.
    pub balance_foreign: Decimal,
}

/// Result of summarizing a user's movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Dataset the summary was built from.
    pub dataset: Dataset,
    /// Native totals, only for currencies that appear.
    pub totals_by_currency: BTreeMap<Currency, Decimal>,
    /// Totals per pool kind, in local currency.
    pub totals_by_pool_kind: PoolKindTotals,
    /// Monthly series in the requested order.
    pub monthly: Vec<MonthlyBucket>,
    /// Per-account breakdown; filled for the balance dataset.
    pub accounts: Vec<AccountSummary>,
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unbounded_range_includes_everything() {
        let request = ReportRequest::default();
        assert!(request.includes(None));
        assert!(request.includes(Some(date(1999, 1, 1))));
    }

    #[test]
    fn test_bounded_range_is_inclusive() {
        let request = ReportRequest {
            from: Some(date(2024, 1, 1)),
            to: Some(date(2024, 1, 31)),
            ..ReportRequest::default()
        };
        assert!(request.includes(Some(date(2024, 1, 1))));
        assert!(request.includes(Some(date(2024, 1, 31))));
        assert!(!request.includes(Some(date(2024, 2, 1))));
        assert!(!request.includes(None));
    }

    #[test]
    fn test_half_open_ranges() {
        let from_only = ReportRequest {
            from: Some(date(2024, 3, 1)),
            ..ReportRequest::default()
        };
        assert!(from_only.includes(Some(date(2030, 1, 1))));
        assert!(!from_only.includes(Some(date(2024, 2, 29))));

        let to_only = ReportRequest {
            to: Some(date(2024, 3, 1)),
            ..ReportRequest::default()
        };
        assert!(to_only.includes(Some(date(2000, 1, 1))));
        assert!(!to_only.includes(Some(date(2024, 3, 2))));
    }

    #[test]
    fn test_pool_filter() {
        let bank = Pool::Bank(AccountId::new());
        assert!(PoolFilter::All.admits(Pool::Cash));
        assert!(PoolFilter::All.admits(bank));
        assert!(PoolFilter::Cash.admits(Pool::Cash));
        assert!(!PoolFilter::Cash.admits(bank));
        assert!(PoolFilter::Bank.admits(bank));
        assert!(!PoolFilter::Bank.admits(Pool::Cash));
    }

    #[test]
    fn test_month_ordering_and_display() {
        let jan = Month::of(date(2024, 1, 15));
        let feb = Month::of(date(2024, 2, 1));
        let dec_prev = Month::of(date(2023, 12, 31));
        assert!(dec_prev < jan && jan < feb);
        assert_eq!(jan.to_string(), "2024-01");
    }
}
