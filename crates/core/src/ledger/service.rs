//! Ledger service for movement validation and resolution.
//!
//! This module provides the core business logic for validating and resolving
//! incomes, expenses, and transfers before they are persisted. The caller
//! loads the referenced account, category, and source balance; the service
//! decides.

use caja_shared::types::UserId;
use rust_decimal::Decimal;

use super::balance::PoolBalance;
use super::error::LedgerError;
use super::types::{
    AccountInfo, CategoryInfo, CategoryKind, MovementDraft, PriorDebit, ResolvedMovement,
    ResolvedTransfer, TransferDraft,
};
use super::validation::{
    available_balance, check_category, check_distinct, ensure_credit_removable,
    ensure_sufficient, movement_currency, pool_account, transfer_currency,
};

/// Ledger service for movement validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validate and resolve an income or expense.
    ///
    /// Steps, in order:
    /// 1. Parses the amount strictly
    /// 2. Checks the bank account behind the pool (exists, live, owned)
    /// 3. Resolves the effective currency
    /// 4. Checks the category against `kind`
    ///
    /// The balance check is separate: see [`LedgerService::check_funds`].
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if any step fails.
    pub fn resolve_movement(
        user: UserId,
        kind: CategoryKind,
        draft: &MovementDraft,
        account: Option<&AccountInfo>,
        category: Option<&CategoryInfo>,
    ) -> Result<ResolvedMovement, LedgerError> {
        let amount = draft.amount.parse()?;
        let account = pool_account(draft.pool, user, account)?;
        let currency = movement_currency(account, draft.currency.as_deref());
        check_category(user, kind, draft.category_id, category)?;

        Ok(ResolvedMovement {
            pool: draft.pool,
            amount,
            currency,
            category_id: draft.category_id,
            date: draft.date,
            note: draft.note.clone(),
        })
    }

    /// Validate and resolve a transfer.
    ///
    /// Steps, in order:
    /// 1. Parses the amount strictly
    /// 2. Checks both bank accounts, when present
    /// 3. Resolves the currency, rejecting two bank accounts in different currencies
    /// 4. Rejects a transfer whose source and destination are the same pool
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if any step fails.
    pub fn resolve_transfer(
        user: UserId,
        draft: &TransferDraft,
        from_account: Option<&AccountInfo>,
        to_account: Option<&AccountInfo>,
    ) -> Result<ResolvedTransfer, LedgerError> {
        let amount = draft.amount.parse()?;
        let from = pool_account(draft.from, user, from_account)?;
        let to = pool_account(draft.to, user, to_account)?;
        let currency = transfer_currency(from, to, draft.currency.as_deref())?;
        check_distinct(draft.from, draft.to)?;

        Ok(ResolvedTransfer {
            from: draft.from,
            to: draft.to,
            amount,
            currency,
            date: draft.date,
            note: draft.note.clone(),
        })
    }

    /// Checks that the source pool can cover a debit of `amount`.
    ///
    /// `balance` is the source pool's current balance in the movement's
    /// currency. `prior` is the debit the movement made before an edit.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientBalance` when the debit would overdraw the pool.
    pub fn check_funds(
        amount: Decimal,
        balance: &PoolBalance,
        prior: Option<&PriorDebit>,
    ) -> Result<(), LedgerError> {
        ensure_sufficient(amount, available_balance(balance, prior))
    }

    /// Checks a pool that lost a credit: an income edited or deleted, or a
    /// transfer that no longer pays into it in full.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientBalance` when the pool ends up
    /// negative and lower than before.
    pub fn check_credit_removal(
        before: &PoolBalance,
        after: &PoolBalance,
    ) -> Result<(), LedgerError> {
        ensure_credit_removable(before, after)
    }
}
