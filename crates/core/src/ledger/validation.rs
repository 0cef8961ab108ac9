//! Movement validation rules.
//!
//! Each rule is a pure function over facts the caller already loaded, so the
//! same rule set runs for creates and updates of every movement kind.

use caja_shared::types::{AccountId, CategoryId, Currency, UserId};
use rust_decimal::Decimal;

use super::balance::PoolBalance;
use super::error::LedgerError;
use super::pool::Pool;
use super::types::{AccountInfo, CategoryInfo, CategoryKind, PriorDebit};

/// Checks that a referenced bank account exists, is live, and belongs to `user`.
///
/// # Errors
///
/// Returns `LedgerError::InvalidAccount` otherwise.
pub fn check_account(
    account_id: AccountId,
    user: UserId,
    account: Option<&AccountInfo>,
) -> Result<&AccountInfo, LedgerError> {
    match account {
        Some(info) if info.id == account_id && info.user_id == user && !info.deleted => Ok(info),
        _ => Err(LedgerError::InvalidAccount(account_id.into_inner())),
    }
}

/// Looks up and checks the account behind `pool`, if it is a bank pool.
///
/// # Errors
///
/// Returns `LedgerError::InvalidAccount` if the pool names an account that
/// fails [`check_account`].
pub fn pool_account(
    pool: Pool,
    user: UserId,
    account: Option<&AccountInfo>,
) -> Result<Option<&AccountInfo>, LedgerError> {
    match pool {
        Pool::Cash => Ok(None),
        Pool::Bank(id) => check_account(id, user, account).map(Some),
    }
}

/// Effective currency of an income or expense.
///
/// A bank account forces its own currency; otherwise the client code is
/// normalized, defaulting to the local currency.
#[must_use]
pub fn movement_currency(account: Option<&AccountInfo>, requested: Option<&str>) -> Currency {
    account.map_or_else(|| Currency::normalize(requested), |info| info.currency)
}

/// Effective currency of a transfer.
///
/// The source account wins, then the destination account, then the client code.
///
/// # Errors
///
/// Returns `LedgerError::CurrencyMismatch` when both sides are bank accounts
/// held in different currencies.
pub fn transfer_currency(
    from: Option<&AccountInfo>,
    to: Option<&AccountInfo>,
    requested: Option<&str>,
) -> Result<Currency, LedgerError> {
    match (from, to) {
        (Some(source), Some(target)) if source.currency != target.currency => {
            Err(LedgerError::CurrencyMismatch {
                from: source.currency,
                to: target.currency,
            })
        }
        (Some(source), _) => Ok(source.currency),
        (None, Some(target)) => Ok(target.currency),
        (None, None) => Ok(Currency::normalize(requested)),
    }
}

/// Checks that a transfer moves money between two different pools.
///
/// # Errors
///
/// Returns `LedgerError::SameAccount` when both sides are the same pool.
pub fn check_distinct(from: Pool, to: Pool) -> Result<(), LedgerError> {
    if from == to {
        return Err(LedgerError::SameAccount);
    }
    Ok(())
}

/// Checks a movement's optional category.
///
/// # Errors
///
/// Returns `LedgerError::InvalidCategory` when the category is missing,
/// deleted, owned by another user, or of the other kind.
pub fn check_category(
    user: UserId,
    kind: CategoryKind,
    category_id: Option<CategoryId>,
    category: Option<&CategoryInfo>,
) -> Result<(), LedgerError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    match category {
        Some(info)
            if info.id == category_id
                && info.user_id == user
                && !info.deleted
                && info.kind == kind =>
        {
            Ok(())
        }
        _ => Err(LedgerError::InvalidCategory(category_id.into_inner())),
    }
}

/// Balance a debit may draw on.
///
/// The movement being edited is taken out of the balance first: its old debit
/// is added back when it drew on the same pool in the same currency, and its
/// old credit is removed when it paid into that pool.
#[must_use]
pub fn available_balance(balance: &PoolBalance, prior: Option<&PriorDebit>) -> Decimal {
    match prior {
        Some(prior) if prior.currency == balance.currency => {
            if prior.pool == balance.pool {
                balance.balance + prior.amount
            } else if prior.credited == Some(balance.pool) {
                balance.balance - prior.amount
            } else {
                balance.balance
            }
        }
        _ => balance.balance,
    }
}

/// Checks that a debit of `requested` does not exceed `available`.
///
/// # Errors
///
/// Returns `LedgerError::InsufficientBalance` otherwise.
pub fn ensure_sufficient(requested: Decimal, available: Decimal) -> Result<(), LedgerError> {
    if requested > available {
        return Err(LedgerError::InsufficientBalance {
            available,
            requested,
        });
    }
    Ok(())
}

/// Checks that taking a credit away from a pool did not overdraw it.
///
/// `before` and `after` are the same pool's balance around the edit. A pool
/// that was already negative may stay where it is, but never drop further.
///
/// # Errors
///
/// Returns `LedgerError::InsufficientBalance` with the pre-edit balance as
/// `available` and the removed credit as `requested`.
pub fn ensure_credit_removable(
    before: &PoolBalance,
    after: &PoolBalance,
) -> Result<(), LedgerError> {
    if after.is_overdrawn() && after.balance < before.balance {
        return Err(LedgerError::InsufficientBalance {
            available: before.balance,
            requested: before.balance - after.balance,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::Ledger;
    use rust_decimal_macros::dec;

    fn account(user: UserId, currency: Currency) -> AccountInfo {
        AccountInfo {
            id: AccountId::new(),
            user_id: user,
            currency,
            initial_balance: None,
            deleted: false,
        }
    }

    fn category(user: UserId, kind: CategoryKind) -> CategoryInfo {
        CategoryInfo {
            id: CategoryId::new(),
            user_id: user,
            kind,
            deleted: false,
        }
    }

    fn balance_of(pool: Pool, currency: Currency, amount: Decimal) -> PoolBalance {
        let mut balance = PoolBalance::compute(pool, currency, &Ledger::default(), None);
        balance.balance = amount;
        balance
    }

    // ========================================================================
    // Account checks
    // ========================================================================

    #[test]
    fn test_check_account_accepts_live_owned() {
        let user = UserId::new();
        let info = account(user, Currency::Usd);
        assert!(check_account(info.id, user, Some(&info)).is_ok());
    }

    #[test]
    fn test_check_account_rejects_missing() {
        let id = AccountId::new();
        assert_eq!(
            check_account(id, UserId::new(), None),
            Err(LedgerError::InvalidAccount(id.into_inner()))
        );
    }

    #[test]
    fn test_check_account_rejects_foreign_owner() {
        let info = account(UserId::new(), Currency::Usd);
        assert!(matches!(
            check_account(info.id, UserId::new(), Some(&info)),
            Err(LedgerError::InvalidAccount(_))
        ));
    }

    #[test]
    fn test_check_account_rejects_deleted() {
        let user = UserId::new();
        let info = AccountInfo {
            deleted: true,
            ..account(user, Currency::Usd)
        };
        assert!(check_account(info.id, user, Some(&info)).is_err());
    }

    #[test]
    fn test_pool_account_cash_needs_nothing() {
        assert_eq!(pool_account(Pool::Cash, UserId::new(), None), Ok(None));
    }

    // ========================================================================
    // Currency resolution
    // ========================================================================

    #[test]
    fn test_bank_account_overrides_requested_currency() {
        let info = account(UserId::new(), Currency::Usd);
        assert_eq!(movement_currency(Some(&info), Some("NIO")), Currency::Usd);
    }

    #[test]
    fn test_cash_currency_is_normalized() {
        assert_eq!(movement_currency(None, Some("usd")), Currency::Usd);
        assert_eq!(movement_currency(None, Some("EUR")), Currency::Nio);
        assert_eq!(movement_currency(None, None), Currency::Nio);
    }

    #[test]
    fn test_transfer_currency_prefers_source_then_destination() {
        let user = UserId::new();
        let usd = account(user, Currency::Usd);
        assert_eq!(transfer_currency(Some(&usd), None, Some("NIO")), Ok(Currency::Usd));
        assert_eq!(transfer_currency(None, Some(&usd), Some("NIO")), Ok(Currency::Usd));
        assert_eq!(transfer_currency(None, None, Some("usd")), Ok(Currency::Usd));
    }

    #[test]
    fn test_transfer_currency_mismatch() {
        let user = UserId::new();
        let usd = account(user, Currency::Usd);
        let nio = account(user, Currency::Nio);
        assert_eq!(
            transfer_currency(Some(&usd), Some(&nio), None),
            Err(LedgerError::CurrencyMismatch {
                from: Currency::Usd,
                to: Currency::Nio,
            })
        );
    }

    // ========================================================================
    // Distinct pools
    // ========================================================================

    #[test]
    fn test_same_bank_account_rejected() {
        let id = AccountId::new();
        assert_eq!(
            check_distinct(Pool::Bank(id), Pool::Bank(id)),
            Err(LedgerError::SameAccount)
        );
    }

    #[test]
    fn test_cash_to_cash_rejected() {
        assert_eq!(check_distinct(Pool::Cash, Pool::Cash), Err(LedgerError::SameAccount));
    }

    #[test]
    fn test_distinct_pools_accepted() {
        assert!(check_distinct(Pool::Cash, Pool::Bank(AccountId::new())).is_ok());
        assert!(check_distinct(Pool::Bank(AccountId::new()), Pool::Bank(AccountId::new())).is_ok());
    }

    // ========================================================================
    // Categories
    // ========================================================================

    #[test]
    fn test_no_category_is_fine() {
        assert!(check_category(UserId::new(), CategoryKind::Expense, None, None).is_ok());
    }

    #[test]
    fn test_category_of_right_kind_accepted() {
        let user = UserId::new();
        let info = category(user, CategoryKind::Income);
        assert!(check_category(user, CategoryKind::Income, Some(info.id), Some(&info)).is_ok());
    }

    #[test]
    fn test_category_of_wrong_kind_rejected() {
        let user = UserId::new();
        let info = category(user, CategoryKind::Income);
        assert_eq!(
            check_category(user, CategoryKind::Expense, Some(info.id), Some(&info)),
            Err(LedgerError::InvalidCategory(info.id.into_inner()))
        );
    }

    #[test]
    fn test_category_missing_foreign_or_deleted_rejected() {
        let user = UserId::new();
        let id = CategoryId::new();
        assert!(check_category(user, CategoryKind::Expense, Some(id), None).is_err());

        let foreign = category(UserId::new(), CategoryKind::Expense);
        assert!(check_category(user, CategoryKind::Expense, Some(foreign.id), Some(&foreign)).is_err());

        let deleted = CategoryInfo {
            deleted: true,
            ..category(user, CategoryKind::Expense)
        };
        assert!(check_category(user, CategoryKind::Expense, Some(deleted.id), Some(&deleted)).is_err());
    }

    // ========================================================================
    // Sufficient balance
    // ========================================================================

    #[test]
    fn test_ensure_sufficient_allows_exact_balance() {
        assert!(ensure_sufficient(dec!(1000), dec!(1000)).is_ok());
    }

    #[test]
    fn test_ensure_sufficient_rejects_overdraw() {
        assert_eq!(
            ensure_sufficient(dec!(1), dec!(0)),
            Err(LedgerError::InsufficientBalance {
                available: dec!(0),
                requested: dec!(1),
            })
        );
    }

    #[test]
    fn test_available_adds_back_same_pool_and_currency() {
        let balance = balance_of(Pool::Cash, Currency::Nio, dec!(10));
        let prior = PriorDebit {
            pool: Pool::Cash,
            credited: None,
            currency: Currency::Nio,
            amount: dec!(90),
        };
        assert_eq!(available_balance(&balance, Some(&prior)), dec!(100));
    }

    #[test]
    fn test_available_no_add_back_when_pool_changed() {
        let balance = balance_of(Pool::Cash, Currency::Nio, dec!(10));
        let prior = PriorDebit {
            pool: Pool::Bank(AccountId::new()),
            credited: None,
            currency: Currency::Nio,
            amount: dec!(90),
        };
        assert_eq!(available_balance(&balance, Some(&prior)), dec!(10));
    }

    #[test]
    fn test_available_no_add_back_when_currency_changed() {
        let balance = balance_of(Pool::Cash, Currency::Usd, dec!(10));
        let prior = PriorDebit {
            pool: Pool::Cash,
            credited: None,
            currency: Currency::Nio,
            amount: dec!(90),
        };
        assert_eq!(available_balance(&balance, Some(&prior)), dec!(10));
    }

    #[test]
    fn test_available_removes_prior_credit_when_direction_flips() {
        let bank = Pool::Bank(AccountId::new());
        let balance = balance_of(Pool::Cash, Currency::Nio, dec!(40));
        let prior = PriorDebit {
            pool: bank,
            credited: Some(Pool::Cash),
            currency: Currency::Nio,
            amount: dec!(40),
        };
        assert_eq!(available_balance(&balance, Some(&prior)), dec!(0));
        assert!(ensure_sufficient(dec!(40), available_balance(&balance, Some(&prior))).is_err());
    }

    #[test]
    fn test_available_ignores_prior_credit_in_other_currency() {
        let balance = balance_of(Pool::Cash, Currency::Usd, dec!(40));
        let prior = PriorDebit {
            pool: Pool::Bank(AccountId::new()),
            credited: Some(Pool::Cash),
            currency: Currency::Nio,
            amount: dec!(40),
        };
        assert_eq!(available_balance(&balance, Some(&prior)), dec!(40));
    }

    #[test]
    fn test_credit_removal_within_balance_accepted() {
        let before = balance_of(Pool::Cash, Currency::Nio, dec!(100));
        let after = balance_of(Pool::Cash, Currency::Nio, dec!(0));
        assert!(ensure_credit_removable(&before, &after).is_ok());
    }

    #[test]
    fn test_credit_removal_overdrawing_rejected() {
        let before = balance_of(Pool::Cash, Currency::Nio, dec!(0));
        let after = balance_of(Pool::Cash, Currency::Nio, dec!(-90));
        assert_eq!(
            ensure_credit_removable(&before, &after),
            Err(LedgerError::InsufficientBalance {
                available: dec!(0),
                requested: dec!(90),
            })
        );
    }

    #[test]
    fn test_credit_added_to_negative_pool_accepted() {
        let before = balance_of(Pool::Cash, Currency::Nio, dec!(-50));
        let after = balance_of(Pool::Cash, Currency::Nio, dec!(-20));
        assert!(ensure_credit_removable(&before, &after).is_ok());
    }
}
