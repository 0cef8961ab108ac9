//! Summary generation service.

use std::collections::BTreeMap;

use caja_shared::types::Currency;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountSnapshot, AccountSummary, Dataset, MonthOrder, Month, MonthlyBucket, MovementRecord,
    PoolKindTotals, ReportData, ReportRequest, Summary, TransferRecord,
};
use crate::currency::CurrencyConverter;
use crate::ledger::{Pool, PoolKind};

/// Service for summarizing a user's movements.
pub struct ReportService;

impl ReportService {
    /// Builds a summary of `data` for `request`.
    ///
    /// `data` holds every live movement and account of one user; filtering by
    /// range and pool happens here.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `from` is after `to`.
    pub fn summarize(
        request: &ReportRequest,
        data: &ReportData,
        fx: &CurrencyConverter,
    ) -> Result<Summary, ReportError> {
        Self::validate_range(request)?;

        let admitted = |record: &&MovementRecord| {
            request.pool_filter.admits(record.pool) && request.includes(record.date)
        };
        let incomes: Vec<&MovementRecord> = match request.dataset {
            Dataset::Expenses => Vec::new(),
            Dataset::Incomes | Dataset::Balance => data.incomes.iter().filter(admitted).collect(),
        };
        let expenses: Vec<&MovementRecord> = match request.dataset {
            Dataset::Incomes => Vec::new(),
            Dataset::Expenses | Dataset::Balance => data.expenses.iter().filter(admitted).collect(),
        };

        let totals_by_currency = Self::currency_totals(&incomes, &expenses);
        let monthly = Self::monthly_series(
            &incomes,
            &expenses,
            fx,
            request.opening_balance,
            request.order,
        );

        let (accounts, totals_by_pool_kind) = match request.dataset {
            Dataset::Incomes => (Vec::new(), Self::pool_kind_totals(&incomes, fx)),
            Dataset::Expenses => (Vec::new(), Self::pool_kind_totals(&expenses, fx)),
            Dataset::Balance => {
                let transfers: Vec<&TransferRecord> = data
                    .transfers
                    .iter()
                    .filter(|t| request.includes(t.date))
                    .collect();

                let accounts = if request.pool_filter.admits_kind(PoolKind::Bank) {
                    Self::account_breakdown(&data.accounts, &incomes, &expenses, &transfers, fx)
                } else {
                    Vec::new()
                };
                let bank: Decimal = accounts.iter().map(|a| a.balance_local).sum();
                let cash = if request.pool_filter.admits_kind(PoolKind::Cash) {
                    Self::cash_net(&incomes, &expenses, &transfers, fx)
                } else {
                    Decimal::ZERO
                };

                (
                    accounts,
                    PoolKindTotals {
                        total: bank + cash,
                        bank,
                        cash,
                    },
                )
            }
        };

        Ok(Summary {
            dataset: request.dataset,
            totals_by_currency,
            totals_by_pool_kind,
            monthly,
            accounts,
        })
    }

    /// Rejects ranges whose start is after their end.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` in that case.
    pub fn validate_range(request: &ReportRequest) -> Result<(), ReportError> {
        if let (Some(start), Some(end)) = (request.from, request.to)
            && start > end
        {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(())
    }

    /// Native totals per currency: incomes minus expenses.
    ///
    /// A currency gets an entry only if some movement uses it.
    #[must_use]
    pub fn currency_totals(
        incomes: &[&MovementRecord],
        expenses: &[&MovementRecord],
    ) -> BTreeMap<Currency, Decimal> {
        let mut totals = BTreeMap::new();
        for income in incomes {
            *totals.entry(income.currency).or_insert(Decimal::ZERO) += income.amount;
        }
        for expense in expenses {
            *totals.entry(expense.currency).or_insert(Decimal::ZERO) -= expense.amount;
        }
        totals
    }

    /// Totals of one stream per pool kind, converted to local currency.
    #[must_use]
    pub fn pool_kind_totals(records: &[&MovementRecord], fx: &CurrencyConverter) -> PoolKindTotals {
        let mut totals = PoolKindTotals::default();
        for record in records {
            let local = fx.to_local(record.amount, record.currency);
            match record.pool.kind() {
                PoolKind::Bank => totals.bank += local,
                PoolKind::Cash => totals.cash += local,
            }
        }
        totals.total = totals.bank + totals.cash;
        totals
    }

    /// Monthly series with carry-forward.
    ///
    /// Carries are always computed oldest month first; `order` only affects
    /// the returned order. Undated movements are left out.
    #[must_use]
    pub fn monthly_series(
        incomes: &[&MovementRecord],
        expenses: &[&MovementRecord],
        fx: &CurrencyConverter,
        opening_balance: Decimal,
        order: MonthOrder,
    ) -> Vec<MonthlyBucket> {
        let mut months: BTreeMap<Month, (Decimal, Decimal)> = BTreeMap::new();
        for income in incomes {
            if let Some(date) = income.date {
                months.entry(Month::of(date)).or_default().0 +=
                    fx.to_local(income.amount, income.currency);
            }
        }
        for expense in expenses {
            if let Some(date) = expense.date {
                months.entry(Month::of(date)).or_default().1 +=
                    fx.to_local(expense.amount, expense.currency);
            }
        }

        let mut carry = opening_balance;
        let mut series: Vec<MonthlyBucket> = months
            .into_iter()
            .map(|(month, (incomes, expenses))| {
                let carry_in = carry;
                carry = carry_in + incomes - expenses;
                MonthlyBucket {
                    month,
                    incomes,
                    expenses,
                    carry_in,
                    carry_out: carry,
                }
            })
            .collect();

        if order == MonthOrder::Descending {
            series.reverse();
        }
        series
    }

    /// Per-account lines for every live account, movements or not.
    ///
    /// Sorted by name, case-insensitively, with unnamed accounts first.
    #[must_use]
    pub fn account_breakdown(
        accounts: &[AccountSnapshot],
        incomes: &[&MovementRecord],
        expenses: &[&MovementRecord],
        transfers: &[&TransferRecord],
        fx: &CurrencyConverter,
    ) -> Vec<AccountSummary> {
        let mut lines: Vec<AccountSummary> = accounts
            .iter()
            .map(|account| {
                let pool = Pool::Bank(account.id);
                let on_account = |record: &&&MovementRecord| {
                    record.pool == pool && record.currency == account.currency
                };
                let sent = |t: &&&TransferRecord| t.from == pool && t.currency == account.currency;
                let received =
                    |t: &&&TransferRecord| t.to == pool && t.currency == account.currency;

                let initial_balance = account.initial_balance.unwrap_or(Decimal::ZERO);
                let incomes: Decimal = incomes.iter().filter(on_account).map(|r| r.amount).sum();
                let expenses: Decimal = expenses.iter().filter(on_account).map(|r| r.amount).sum();
                let transfers_in: Decimal =
                    transfers.iter().filter(received).map(|t| t.amount).sum();
                let transfers_out: Decimal = transfers.iter().filter(sent).map(|t| t.amount).sum();
                let balance = initial_balance + incomes + transfers_in - expenses - transfers_out;

                AccountSummary {
                    id: account.id,
                    name: account.name.clone(),
                    institution: account.institution.clone(),
                    currency: account.currency,
                    initial_balance,
                    incomes,
                    expenses,
                    transfers_in,
                    transfers_out,
                    balance,
                    balance_local: fx.to_local(balance, account.currency),
                    balance_foreign: fx.to_foreign(balance, account.currency),
                }
            })
            .collect();

        lines.sort_by_cached_key(|line| {
            (
                line.name.as_deref().unwrap_or_default().trim().to_lowercase(),
                line.id,
            )
        });
        lines
    }

    /// Net movement of the cash pool in local currency, both currencies combined.
    #[must_use]
    pub fn cash_net(
        incomes: &[&MovementRecord],
        expenses: &[&MovementRecord],
        transfers: &[&TransferRecord],
        fx: &CurrencyConverter,
    ) -> Decimal {
        let local = |amount, currency| fx.to_local(amount, currency);

        let credits: Decimal = incomes
            .iter()
            .filter(|r| r.pool == Pool::Cash)
            .map(|r| local(r.amount, r.currency))
            .chain(
                transfers
                    .iter()
                    .filter(|t| t.to == Pool::Cash)
                    .map(|t| local(t.amount, t.currency)),
            )
            .sum();
        let debits: Decimal = expenses
            .iter()
            .filter(|r| r.pool == Pool::Cash)
            .map(|r| local(r.amount, r.currency))
            .chain(
                transfers
                    .iter()
                    .filter(|t| t.from == Pool::Cash)
                    .map(|t| local(t.amount, t.currency)),
            )
            .sum();

        credits - debits
    }
}
