//! Property-based tests for the ledger service.
//!
//! Feature: balance-engine
//! - Property 3: Transfers conserve money across pools
//! - Property 4: Editing a debit in place never double-counts it

use caja_shared::types::{AccountId, Currency, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::balance::PoolBalance;
use super::entry::{Ledger, LedgerRow};
use super::pool::Pool;
use super::service::LedgerService;
use super::types::{AccountInfo, PriorDebit, RawAmount, TransferDraft};

/// Strategy to generate amounts from 0.01 to 10,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a currency.
fn currency() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::Nio), Just(Currency::Usd)]
}

fn row(amount: Decimal, currency: Currency) -> LedgerRow {
    LedgerRow {
        id: Uuid::now_v7(),
        amount,
        currency,
        date: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 3: Transfers conserve money across pools
    // =========================================================================

    /// *For any* accepted bank-to-cash transfer, the source loses exactly what
    /// the destination gains, so the sum of both pools is unchanged.
    #[test]
    fn prop_transfer_conserves_total(
        initial in positive_amount(),
        amount in positive_amount(),
        currency in currency(),
    ) {
        let user = UserId::new();
        let account = AccountInfo {
            id: AccountId::new(),
            user_id: user,
            currency,
            initial_balance: Some(initial),
            deleted: false,
        };
        let bank = Pool::Bank(account.id);
        let draft = TransferDraft {
            from: bank,
            to: Pool::Cash,
            amount: RawAmount::from(amount),
            currency: None,
            date: None,
            note: None,
        };

        let resolved = LedgerService::resolve_transfer(user, &draft, Some(&account), None).unwrap();
        prop_assert_eq!(resolved.currency, currency);

        let bank_before = PoolBalance::compute(bank, currency, &Ledger::default(), Some(&account));
        let cash_before = PoolBalance::compute(Pool::Cash, currency, &Ledger::default(), None);

        let accepted = LedgerService::check_funds(resolved.amount, &bank_before, None).is_ok();
        prop_assert_eq!(accepted, amount <= initial);

        if accepted {
            let bank_ledger = Ledger {
                transfers_out: vec![row(resolved.amount, currency)],
                ..Ledger::default()
            };
            let cash_ledger = Ledger {
                transfers_in: vec![row(resolved.amount, currency)],
                ..Ledger::default()
            };
            let bank_after = PoolBalance::compute(bank, currency, &bank_ledger, Some(&account));
            let cash_after = PoolBalance::compute(Pool::Cash, currency, &cash_ledger, None);

            prop_assert_eq!(
                bank_before.balance + cash_before.balance,
                bank_after.balance + cash_after.balance
            );
            prop_assert!(!bank_after.is_overdrawn());
        }
    }

    // =========================================================================
    // Property 4: Editing a debit in place never double-counts it
    // =========================================================================

    /// *For any* recorded expense, re-submitting it unchanged on the same pool
    /// and currency is always accepted.
    #[test]
    fn prop_unchanged_edit_accepted(
        income in positive_amount(),
        ratio in 1u32..=100u32,
    ) {
        let expense = (income * Decimal::from(ratio) / Decimal::from(100)).round_dp(2);
        let ledger = Ledger {
            incomes: vec![row(income, Currency::Nio)],
            expenses: vec![row(expense, Currency::Nio)],
            ..Ledger::default()
        };
        let balance = PoolBalance::compute(Pool::Cash, Currency::Nio, &ledger, None);
        let prior = PriorDebit {
            pool: Pool::Cash,
            credited: None,
            currency: Currency::Nio,
            amount: expense,
        };

        prop_assert!(LedgerService::check_funds(expense, &balance, Some(&prior)).is_ok());
    }

    /// *For any* recorded expense moved to another currency, the old amount is
    /// not credited back, so the new pool must cover it on its own.
    #[test]
    fn prop_currency_change_gets_no_add_back(
        expense in positive_amount(),
    ) {
        let balance = PoolBalance::compute(Pool::Cash, Currency::Usd, &Ledger::default(), None);
        let prior = PriorDebit {
            pool: Pool::Cash,
            credited: None,
            currency: Currency::Nio,
            amount: expense,
        };

        prop_assert!(LedgerService::check_funds(expense, &balance, Some(&prior)).is_err());
    }
}
