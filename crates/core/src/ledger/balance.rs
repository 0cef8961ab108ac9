//! Pool balance calculations.
//!
//! `balance = initial + incomes + transfers_in - expenses - transfers_out`,
//! recomputed from the ledger on every call.

use caja_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::{Ledger, sum_rows};
use super::pool::Pool;
use super::types::AccountInfo;

/// Balance of one pool in one currency, with the sums that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolBalance {
    /// The pool.
    pub pool: Pool,
    /// The currency the balance is held in.
    pub currency: Currency,
    /// Opening balance applied.
    pub initial: Decimal,
    /// Sum of incomes.
    pub incomes: Decimal,
    /// Sum of expenses.
    pub expenses: Decimal,
    /// Sum of incoming transfers.
    pub transfers_in: Decimal,
    /// Sum of outgoing transfers.
    pub transfers_out: Decimal,
    /// Resulting balance.
    pub balance: Decimal,
}

impl PoolBalance {
    /// Folds a pool's ledger into its balance.
    ///
    /// `account` is the bank account behind the pool, if any; its opening
    /// balance counts only when it matches the pool and the currency.
    #[must_use]
    pub fn compute(
        pool: Pool,
        currency: Currency,
        ledger: &Ledger,
        account: Option<&AccountInfo>,
    ) -> Self {
        let initial = initial_balance(pool, currency, account);
        let incomes = sum_rows(&ledger.incomes);
        let expenses = sum_rows(&ledger.expenses);
        let transfers_in = sum_rows(&ledger.transfers_in);
        let transfers_out = sum_rows(&ledger.transfers_out);

        Self {
            pool,
            currency,
            initial,
            incomes,
            expenses,
            transfers_in,
            transfers_out,
            balance: initial + incomes + transfers_in - expenses - transfers_out,
        }
    }

    /// Returns true if the balance is below zero.
    #[must_use]
    pub fn is_overdrawn(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}

/// Opening balance that applies to `pool` in `currency`.
///
/// Only a bank pool whose account is held in `currency` has one; cash pools
/// and mismatched currencies start at zero.
#[must_use]
pub fn initial_balance(pool: Pool, currency: Currency, account: Option<&AccountInfo>) -> Decimal {
    match (pool, account) {
        (Pool::Bank(id), Some(account)) if account.id == id && account.currency == currency => {
            account.initial_balance.unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::LedgerRow;
    use caja_shared::types::{AccountId, UserId};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn row(amount: Decimal, currency: Currency) -> LedgerRow {
        LedgerRow {
            id: Uuid::now_v7(),
            amount,
            currency,
            date: None,
        }
    }

    fn account(id: AccountId, currency: Currency, initial: Option<Decimal>) -> AccountInfo {
        AccountInfo {
            id,
            user_id: UserId::new(),
            currency,
            initial_balance: initial,
            deleted: false,
        }
    }

    #[test]
    fn test_empty_cash_ledger_is_zero() {
        let balance = PoolBalance::compute(Pool::Cash, Currency::Nio, &Ledger::default(), None);
        assert_eq!(balance.balance, Decimal::ZERO);
        assert!(!balance.is_overdrawn());
    }

    #[test]
    fn test_balance_formula() {
        let ledger = Ledger {
            incomes: vec![row(dec!(100), Currency::Nio), row(dec!(50.25), Currency::Nio)],
            expenses: vec![row(dec!(30), Currency::Nio)],
            transfers_out: vec![row(dec!(20), Currency::Nio)],
            transfers_in: vec![row(dec!(5.75), Currency::Nio)],
        };
        let balance = PoolBalance::compute(Pool::Cash, Currency::Nio, &ledger, None);

        assert_eq!(balance.incomes, dec!(150.25));
        assert_eq!(balance.expenses, dec!(30));
        assert_eq!(balance.transfers_in, dec!(5.75));
        assert_eq!(balance.transfers_out, dec!(20));
        assert_eq!(balance.balance, dec!(106.00));
    }

    #[test]
    fn test_initial_balance_applies_to_matching_bank_account() {
        let id = AccountId::new();
        let info = account(id, Currency::Usd, Some(dec!(1000)));

        let balance =
            PoolBalance::compute(Pool::Bank(id), Currency::Usd, &Ledger::default(), Some(&info));
        assert_eq!(balance.initial, dec!(1000));
        assert_eq!(balance.balance, dec!(1000));
    }

    #[test]
    fn test_initial_balance_ignored_for_other_currency() {
        let id = AccountId::new();
        let info = account(id, Currency::Usd, Some(dec!(1000)));

        assert_eq!(initial_balance(Pool::Bank(id), Currency::Nio, Some(&info)), Decimal::ZERO);
    }

    #[test]
    fn test_initial_balance_ignored_for_other_account_or_cash() {
        let info = account(AccountId::new(), Currency::Usd, Some(dec!(1000)));

        assert_eq!(
            initial_balance(Pool::Bank(AccountId::new()), Currency::Usd, Some(&info)),
            Decimal::ZERO
        );
        assert_eq!(initial_balance(Pool::Cash, Currency::Usd, Some(&info)), Decimal::ZERO);
    }

    #[test]
    fn test_missing_initial_balance_is_zero() {
        let id = AccountId::new();
        let info = account(id, Currency::Nio, None);
        assert_eq!(initial_balance(Pool::Bank(id), Currency::Nio, Some(&info)), Decimal::ZERO);
    }

    #[test]
    fn test_overdrawn() {
        let ledger = Ledger {
            expenses: vec![row(dec!(1), Currency::Nio)],
            ..Ledger::default()
        };
        let balance = PoolBalance::compute(Pool::Cash, Currency::Nio, &ledger, None);
        assert!(balance.is_overdrawn());
    }
}
