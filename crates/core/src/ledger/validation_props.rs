//! Property-based tests for movement validation.
//!
//! Feature: balance-engine
//! - Property 1: Validated debits never overdraw a pool
//! - Property 2: Amount parsing is strict

use caja_shared::types::{AccountId, Currency, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::balance::PoolBalance;
use super::entry::{Ledger, LedgerRow};
use super::error::LedgerError;
use super::pool::Pool;
use super::service::LedgerService;
use super::types::{AccountInfo, RawAmount};

/// A step applied to a single pool.
#[derive(Debug, Clone)]
enum Step {
    Income(Decimal),
    Expense(Decimal),
    TransferOut(Decimal),
    TransferIn(Decimal),
}

/// Strategy to generate amounts from 0.01 to 10,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a single step.
fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        positive_amount().prop_map(Step::Income),
        positive_amount().prop_map(Step::Expense),
        positive_amount().prop_map(Step::TransferOut),
        positive_amount().prop_map(Step::TransferIn),
    ]
}

/// Strategy to generate an optional opening balance.
fn opening_balance() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((0i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2)))
}

fn row(amount: Decimal) -> LedgerRow {
    LedgerRow {
        id: Uuid::now_v7(),
        amount,
        currency: Currency::Nio,
        date: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 1: Validated debits never overdraw a pool
    // =========================================================================

    /// *For any* sequence of movements where every expense and outgoing
    /// transfer passed the funds check before being recorded, the pool's
    /// balance stays non-negative after every step.
    #[test]
    fn prop_validated_sequence_never_negative(
        steps in prop::collection::vec(step(), 1..40),
        initial in opening_balance(),
    ) {
        let user = UserId::new();
        let account = AccountInfo {
            id: AccountId::new(),
            user_id: user,
            currency: Currency::Nio,
            initial_balance: initial,
            deleted: false,
        };
        let pool = Pool::Bank(account.id);
        let mut ledger = Ledger::default();

        for step in steps {
            let current = PoolBalance::compute(pool, Currency::Nio, &ledger, Some(&account));
            match step {
                Step::Income(amount) => ledger.incomes.push(row(amount)),
                Step::TransferIn(amount) => ledger.transfers_in.push(row(amount)),
                Step::Expense(amount) => {
                    if LedgerService::check_funds(amount, &current, None).is_ok() {
                        ledger.expenses.push(row(amount));
                    }
                }
                Step::TransferOut(amount) => {
                    if LedgerService::check_funds(amount, &current, None).is_ok() {
                        ledger.transfers_out.push(row(amount));
                    }
                }
            }

            let after = PoolBalance::compute(pool, Currency::Nio, &ledger, Some(&account));
            prop_assert!(!after.is_overdrawn(), "balance went negative: {}", after.balance);
        }
    }

    /// *For any* balance and debit, the funds check rejects exactly the debits
    /// larger than the balance, and reports both figures.
    #[test]
    fn prop_funds_check_boundary(
        income in positive_amount(),
        debit in positive_amount(),
    ) {
        let ledger = Ledger {
            incomes: vec![row(income)],
            ..Ledger::default()
        };
        let balance = PoolBalance::compute(Pool::Cash, Currency::Nio, &ledger, None);
        let result = LedgerService::check_funds(debit, &balance, None);

        if debit > income {
            prop_assert_eq!(
                result,
                Err(LedgerError::InsufficientBalance { available: income, requested: debit })
            );
        } else {
            prop_assert!(result.is_ok());
        }
    }

    // =========================================================================
    // Property 2: Amount parsing is strict
    // =========================================================================

    /// *For any* two-decimal amount written as text, parsing returns the same value.
    #[test]
    fn prop_two_decimal_text_parses(amount in positive_amount()) {
        let parsed = RawAmount::from(amount.to_string()).parse().unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// *For any* amount with a third significant decimal, parsing rejects it.
    #[test]
    fn prop_three_decimals_rejected(
        cents in 0i64..1_000_000i64,
        extra in 1i64..10i64,
    ) {
        let amount = Decimal::new(cents * 10 + extra, 3);
        prop_assert!(matches!(
            RawAmount::from(amount).parse(),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    /// *For any* negative amount, parsing rejects it.
    #[test]
    fn prop_negative_rejected(amount in positive_amount()) {
        prop_assert!(matches!(
            RawAmount::from(-amount).parse(),
            Err(LedgerError::InvalidAmount(_))
        ));
    }
}
