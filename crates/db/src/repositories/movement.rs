//! Movement repository: validated writes of incomes, expenses, and transfers.
//!
//! Every create and update resolves the draft through
//! [`LedgerService`](caja_core::ledger::LedgerService), locks the pools it
//! touches, and re-checks the source balance inside the write transaction.
//! Edits and deletes that take a credit away from a pool re-check that pool
//! after the write. A rejected write leaves no trace in the database.

use caja_core::ledger::{
    CategoryKind, LedgerError, LedgerService, MovementDraft, Pool, PoolBalance, PriorDebit,
    ResolvedMovement, ResolvedTransfer, TransferDraft,
};
use caja_shared::AppError;
use caja_shared::types::money::to_minor_units;
use caja_shared::types::{
    CategoryId, Currency, ExpenseId, IncomeId, PageRequest, PageResponse, TransferId, UserId,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info, warn};

use super::account::AccountRepository;
use super::balance::BalanceRepository;
use super::category::CategoryRepository;
use super::ledger::on_pool;
use crate::entities::{expenses, incomes, transfers};
use crate::locks::{PoolGuard, PoolKey, PoolLocks};
use crate::soft_delete::SoftDelete;

/// Error types for movement operations.
///
/// Business rule violations and storage failures are kept apart so callers
/// can tell a rejected movement from an unavailable database.
#[derive(Debug, thiserror::Error)]
pub enum MovementError {
    /// Business rule violation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl MovementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// The business error, if this is one.
    #[must_use]
    pub const fn as_ledger(&self) -> Option<&LedgerError> {
        match self {
            Self::Ledger(err) => Some(err),
            Self::Database(_) => None,
        }
    }
}

impl From<MovementError> for AppError {
    fn from(err: MovementError) -> Self {
        match err {
            MovementError::Ledger(err) => err.into(),
            MovementError::Database(err) => Self::Database(err.to_string()),
        }
    }
}

/// Filter options for listing movements.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Earliest date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest date, inclusive.
    pub to: Option<NaiveDate>,
    /// Only movements on this pool; transfers match on either side.
    pub pool: Option<Pool>,
}

impl MovementFilter {
    fn dates<C: ColumnTrait>(&self, column: C) -> Condition {
        let mut condition = Condition::all();
        if let Some(from) = self.from {
            condition = condition.add(column.gte(from));
        }
        if let Some(to) = self.to {
            condition = condition.add(column.lte(to));
        }
        condition
    }
}

/// Movement repository.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
    locks: PoolLocks,
}

impl MovementRepository {
    /// Creates a new movement repository with its own pool locks.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_locks(db, PoolLocks::new())
    }

    /// Creates a repository sharing `locks` with other writers.
    #[must_use]
    pub const fn with_locks(db: DatabaseConnection, locks: PoolLocks) -> Self {
        Self { db, locks }
    }

    /// The pool locks this repository writes under.
    #[must_use]
    pub const fn locks(&self) -> &PoolLocks {
        &self.locks
    }

    // ========================================================================
    // Incomes
    // ========================================================================

    /// Records an income. Incomes never need funds.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` if the amount, account, or category is invalid.
    pub async fn create_income(
        &self,
        user: UserId,
        draft: MovementDraft,
    ) -> Result<incomes::Model, MovementError> {
        self.insert_income(user, &draft)
            .await
            .inspect_err(|err| rejected("create_income", user, err))
    }

    /// Replaces an income with `draft`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` for an unknown income, or a
    /// `LedgerError` if the draft is invalid.
    pub async fn update_income(
        &self,
        user: UserId,
        id: IncomeId,
        draft: MovementDraft,
    ) -> Result<incomes::Model, MovementError> {
        self.replace_income(user, id, &draft)
            .await
            .inspect_err(|err| rejected("update_income", user, err))
    }

    /// Soft-deletes an income.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` for an unknown income, or
    /// `InsufficientBalance` if the pool already spent it.
    pub async fn delete_income(&self, user: UserId, id: IncomeId) -> Result<(), MovementError> {
        self.remove_income(user, id)
            .await
            .inspect_err(|err| rejected("delete_income", user, err))
    }

    /// Lists live incomes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_incomes(
        &self,
        user: UserId,
        filter: &MovementFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<incomes::Model>, MovementError> {
        let mut query = incomes::Entity::find_live_owned(user)
            .filter(filter.dates(incomes::Column::Date));
        if let Some(pool) = filter.pool {
            query = query.filter(on_pool(incomes::Column::Kind, incomes::Column::AccountId, pool));
        }

        let paginator = query
            .order_by_desc(incomes::Column::Date)
            .order_by_desc(incomes::Column::CreatedAt)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;
        Ok(PageResponse::new(data, page, total))
    }

    async fn insert_income(
        &self,
        user: UserId,
        draft: &MovementDraft,
    ) -> Result<incomes::Model, MovementError> {
        let movement = self.resolve(user, CategoryKind::Income, draft).await?;
        let _guard = self.locks.lock([key(user, movement.pool, movement.currency)]).await;

        let txn = self.db.begin().await?;
        let now = Utc::now();
        let income = incomes::ActiveModel {
            id: Set(IncomeId::new().into_inner()),
            user_id: Set(user.into_inner()),
            kind: Set(movement.pool.kind().as_str().to_string()),
            account_id: Set(movement.pool.account_uuid()),
            category_id: Set(movement.category_id.map(CategoryId::into_inner)),
            amount_minor: Set(minor_units(movement.amount)?),
            currency: Set(movement.currency.code().to_string()),
            date: Set(movement.date),
            note: Set(movement.note.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(
            user_id = %user,
            income_id = %income.id,
            pool = %movement.pool,
            amount = %movement.amount,
            currency = %movement.currency,
            "Income created"
        );
        Ok(income)
    }

    async fn replace_income(
        &self,
        user: UserId,
        id: IncomeId,
        draft: &MovementDraft,
    ) -> Result<incomes::Model, MovementError> {
        let seen = live_income(&self.db, user, id).await?;
        let movement = self.resolve(user, CategoryKind::Income, draft).await?;
        let (_guard, txn, existing) = self
            .lock_income(user, seen, &[key(user, movement.pool, movement.currency)])
            .await?;
        let credited = credited_balance(&txn, user, existing.pool()?, existing.currency()?).await?;

        let mut active: incomes::ActiveModel = existing.into();
        active.kind = Set(movement.pool.kind().as_str().to_string());
        active.account_id = Set(movement.pool.account_uuid());
        active.category_id = Set(movement.category_id.map(CategoryId::into_inner));
        active.amount_minor = Set(minor_units(movement.amount)?);
        active.currency = Set(movement.currency.code().to_string());
        active.date = Set(movement.date);
        active.note = Set(movement.note.clone());
        active.updated_at = Set(Utc::now());
        let income = active.update(&txn).await?;
        ensure_credit_kept(&txn, user, credited).await?;
        txn.commit().await?;

        info!(user_id = %user, income_id = %id, amount = %movement.amount, "Income updated");
        Ok(income)
    }

    async fn remove_income(&self, user: UserId, id: IncomeId) -> Result<(), MovementError> {
        let seen = live_income(&self.db, user, id).await?;
        let (_guard, txn, existing) = self.lock_income(user, seen, &[]).await?;
        let credited = credited_balance(&txn, user, existing.pool()?, existing.currency()?).await?;

        let mut active: incomes::ActiveModel = existing.into();
        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&txn).await?;
        ensure_credit_kept(&txn, user, credited).await?;
        txn.commit().await?;

        info!(user_id = %user, income_id = %id, "Income deleted");
        Ok(())
    }

    /// Locks the pool `seen` sits on plus `extra`, then re-reads the income
    /// inside a new transaction. Retries when the income moved to another
    /// pool while the locks were awaited.
    async fn lock_income(
        &self,
        user: UserId,
        mut seen: incomes::Model,
        extra: &[PoolKey],
    ) -> Result<(PoolGuard, DatabaseTransaction, incomes::Model), MovementError> {
        let id = IncomeId::from_uuid(seen.id);
        loop {
            let held = income_key(user, &seen)?;
            let guard = self.locks.lock(extra.iter().copied().chain([held])).await;
            let txn = self.db.begin().await?;
            let existing = live_income(&txn, user, id).await?;
            if income_key(user, &existing)? == held {
                return Ok((guard, txn, existing));
            }
            debug!(user_id = %user, income_id = %id, "Income moved while locking, retrying");
            seen = existing;
        }
    }

    // ========================================================================
    // Expenses
    // ========================================================================

    /// Records an expense after checking the pool can cover it.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` if the amount, account, or category is
    /// invalid, or `InsufficientBalance` if the pool cannot cover it.
    pub async fn create_expense(
        &self,
        user: UserId,
        draft: MovementDraft,
    ) -> Result<expenses::Model, MovementError> {
        self.insert_expense(user, &draft)
            .await
            .inspect_err(|err| rejected("create_expense", user, err))
    }

    /// Replaces an expense with `draft`.
    ///
    /// The expense's own amount is added back to the available balance only
    /// when it stays on the same pool and currency.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` for an unknown expense, or a
    /// `LedgerError` if the draft is invalid or cannot be covered.
    pub async fn update_expense(
        &self,
        user: UserId,
        id: ExpenseId,
        draft: MovementDraft,
    ) -> Result<expenses::Model, MovementError> {
        self.replace_expense(user, id, &draft)
            .await
            .inspect_err(|err| rejected("update_expense", user, err))
    }

    /// Soft-deletes an expense.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` for an unknown expense.
    pub async fn delete_expense(&self, user: UserId, id: ExpenseId) -> Result<(), MovementError> {
        let txn = self.db.begin().await?;
        let existing = live_expense(&txn, user, id).await?;

        let mut active: expenses::ActiveModel = existing.into();
        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&txn).await?;
        txn.commit().await?;

        info!(user_id = %user, expense_id = %id, "Expense deleted");
        Ok(())
    }

    /// Lists live expenses, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_expenses(
        &self,
        user: UserId,
        filter: &MovementFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<expenses::Model>, MovementError> {
        let mut query = expenses::Entity::find_live_owned(user)
            .filter(filter.dates(expenses::Column::Date));
        if let Some(pool) = filter.pool {
            query = query.filter(on_pool(
                expenses::Column::Kind,
                expenses::Column::AccountId,
                pool,
            ));
        }

        let paginator = query
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;
        Ok(PageResponse::new(data, page, total))
    }

    async fn insert_expense(
        &self,
        user: UserId,
        draft: &MovementDraft,
    ) -> Result<expenses::Model, MovementError> {
        let movement = self.resolve(user, CategoryKind::Expense, draft).await?;
        let _guard = self.locks.lock([key(user, movement.pool, movement.currency)]).await;

        let txn = self.db.begin().await?;
        ensure_funds(
            &txn,
            user,
            movement.pool,
            movement.currency,
            movement.amount,
            None,
        )
        .await?;

        let now = Utc::now();
        let expense = expenses::ActiveModel {
            id: Set(ExpenseId::new().into_inner()),
            user_id: Set(user.into_inner()),
            kind: Set(movement.pool.kind().as_str().to_string()),
            account_id: Set(movement.pool.account_uuid()),
            category_id: Set(movement.category_id.map(CategoryId::into_inner)),
            amount_minor: Set(minor_units(movement.amount)?),
            currency: Set(movement.currency.code().to_string()),
            date: Set(movement.date),
            note: Set(movement.note.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(
            user_id = %user,
            expense_id = %expense.id,
            pool = %movement.pool,
            amount = %movement.amount,
            currency = %movement.currency,
            "Expense created"
        );
        Ok(expense)
    }

    async fn replace_expense(
        &self,
        user: UserId,
        id: ExpenseId,
        draft: &MovementDraft,
    ) -> Result<expenses::Model, MovementError> {
        let mut seen = live_expense(&self.db, user, id).await?;
        let movement = self.resolve(user, CategoryKind::Expense, draft).await?;
        let target = key(user, movement.pool, movement.currency);
        let (_guard, txn, existing, prior) = loop {
            let before = seen.prior_debit()?;
            let held = key(user, before.pool, before.currency);
            let guard = self.locks.lock([held, target]).await;
            let txn = self.db.begin().await?;
            let existing = live_expense(&txn, user, id).await?;
            let prior = existing.prior_debit()?;
            if key(user, prior.pool, prior.currency) == held {
                break (guard, txn, existing, prior);
            }
            debug!(user_id = %user, expense_id = %id, "Expense moved while locking, retrying");
            seen = existing;
        };
        ensure_funds(
            &txn,
            user,
            movement.pool,
            movement.currency,
            movement.amount,
            Some(&prior),
        )
        .await?;

        let mut active: expenses::ActiveModel = existing.into();
        active.kind = Set(movement.pool.kind().as_str().to_string());
        active.account_id = Set(movement.pool.account_uuid());
        active.category_id = Set(movement.category_id.map(CategoryId::into_inner));
        active.amount_minor = Set(minor_units(movement.amount)?);
        active.currency = Set(movement.currency.code().to_string());
        active.date = Set(movement.date);
        active.note = Set(movement.note.clone());
        active.updated_at = Set(Utc::now());
        let expense = active.update(&txn).await?;
        txn.commit().await?;

        info!(user_id = %user, expense_id = %id, amount = %movement.amount, "Expense updated");
        Ok(expense)
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Records a transfer after checking the source can cover it.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError`: `InvalidAccount`, `CurrencyMismatch`,
    /// `SameAccount`, `InvalidAmount`, or `InsufficientBalance`.
    pub async fn create_transfer(
        &self,
        user: UserId,
        draft: TransferDraft,
    ) -> Result<transfers::Model, MovementError> {
        self.insert_transfer(user, &draft)
            .await
            .inspect_err(|err| rejected("create_transfer", user, err))
    }

    /// Replaces a transfer with `draft`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` for an unknown transfer, or any error
    /// [`MovementRepository::create_transfer`] returns.
    pub async fn update_transfer(
        &self,
        user: UserId,
        id: TransferId,
        draft: TransferDraft,
    ) -> Result<transfers::Model, MovementError> {
        self.replace_transfer(user, id, &draft)
            .await
            .inspect_err(|err| rejected("update_transfer", user, err))
    }

    /// Soft-deletes a transfer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` for an unknown transfer, or
    /// `InsufficientBalance` if the destination already spent it.
    pub async fn delete_transfer(&self, user: UserId, id: TransferId) -> Result<(), MovementError> {
        self.remove_transfer(user, id)
            .await
            .inspect_err(|err| rejected("delete_transfer", user, err))
    }

    /// Lists live transfers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transfers(
        &self,
        user: UserId,
        filter: &MovementFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<transfers::Model>, MovementError> {
        let mut query = transfers::Entity::find_live_owned(user)
            .filter(filter.dates(transfers::Column::Date));
        if let Some(pool) = filter.pool {
            query = query.filter(
                Condition::any()
                    .add(on_pool(
                        transfers::Column::FromKind,
                        transfers::Column::FromAccountId,
                        pool,
                    ))
                    .add(on_pool(
                        transfers::Column::ToKind,
                        transfers::Column::ToAccountId,
                        pool,
                    )),
            );
        }

        let paginator = query
            .order_by_desc(transfers::Column::Date)
            .order_by_desc(transfers::Column::CreatedAt)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;
        Ok(PageResponse::new(data, page, total))
    }

    async fn insert_transfer(
        &self,
        user: UserId,
        draft: &TransferDraft,
    ) -> Result<transfers::Model, MovementError> {
        let transfer = self.resolve_transfer(user, draft).await?;
        let _guard = self
            .locks
            .lock([
                key(user, transfer.from, transfer.currency),
                key(user, transfer.to, transfer.currency),
            ])
            .await;

        let txn = self.db.begin().await?;
        ensure_funds(
            &txn,
            user,
            transfer.from,
            transfer.currency,
            transfer.amount,
            None,
        )
        .await?;

        let now = Utc::now();
        let row = transfers::ActiveModel {
            id: Set(TransferId::new().into_inner()),
            user_id: Set(user.into_inner()),
            from_kind: Set(transfer.from.kind().as_str().to_string()),
            from_account_id: Set(transfer.from.account_uuid()),
            to_kind: Set(transfer.to.kind().as_str().to_string()),
            to_account_id: Set(transfer.to.account_uuid()),
            amount_minor: Set(minor_units(transfer.amount)?),
            currency: Set(transfer.currency.code().to_string()),
            date: Set(transfer.date),
            note: Set(transfer.note.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(
            user_id = %user,
            transfer_id = %row.id,
            from = %transfer.from,
            to = %transfer.to,
            amount = %transfer.amount,
            currency = %transfer.currency,
            "Transfer created"
        );
        Ok(row)
    }

    async fn replace_transfer(
        &self,
        user: UserId,
        id: TransferId,
        draft: &TransferDraft,
    ) -> Result<transfers::Model, MovementError> {
        let seen = live_transfer(&self.db, user, id).await?;
        let transfer = self.resolve_transfer(user, draft).await?;
        let targets = [
            key(user, transfer.from, transfer.currency),
            key(user, transfer.to, transfer.currency),
        ];
        let (_guard, txn, existing) = self.lock_transfer(user, seen, &targets).await?;
        let prior = existing.prior_debit()?;
        let credited = match prior.credited {
            Some(pool) => credited_balance(&txn, user, pool, prior.currency).await?,
            None => None,
        };
        ensure_funds(
            &txn,
            user,
            transfer.from,
            transfer.currency,
            transfer.amount,
            Some(&prior),
        )
        .await?;

        let mut active: transfers::ActiveModel = existing.into();
        active.from_kind = Set(transfer.from.kind().as_str().to_string());
        active.from_account_id = Set(transfer.from.account_uuid());
        active.to_kind = Set(transfer.to.kind().as_str().to_string());
        active.to_account_id = Set(transfer.to.account_uuid());
        active.amount_minor = Set(minor_units(transfer.amount)?);
        active.currency = Set(transfer.currency.code().to_string());
        active.date = Set(transfer.date);
        active.note = Set(transfer.note.clone());
        active.updated_at = Set(Utc::now());
        let row = active.update(&txn).await?;
        ensure_credit_kept(&txn, user, credited).await?;
        txn.commit().await?;

        info!(user_id = %user, transfer_id = %id, amount = %transfer.amount, "Transfer updated");
        Ok(row)
    }

    async fn remove_transfer(&self, user: UserId, id: TransferId) -> Result<(), MovementError> {
        let seen = live_transfer(&self.db, user, id).await?;
        let (_guard, txn, existing) = self.lock_transfer(user, seen, &[]).await?;
        let record = existing.record()?;
        let credited = credited_balance(&txn, user, record.to, record.currency).await?;

        let mut active: transfers::ActiveModel = existing.into();
        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&txn).await?;
        ensure_credit_kept(&txn, user, credited).await?;
        txn.commit().await?;

        info!(user_id = %user, transfer_id = %id, "Transfer deleted");
        Ok(())
    }

    /// Locks both sides of `seen` plus `extra`, then re-reads the transfer
    /// inside a new transaction. Retries when either side changed while the
    /// locks were awaited.
    async fn lock_transfer(
        &self,
        user: UserId,
        mut seen: transfers::Model,
        extra: &[PoolKey],
    ) -> Result<(PoolGuard, DatabaseTransaction, transfers::Model), MovementError> {
        let id = TransferId::from_uuid(seen.id);
        loop {
            let held = transfer_keys(user, &seen)?;
            let guard = self.locks.lock(extra.iter().copied().chain(held)).await;
            let txn = self.db.begin().await?;
            let existing = live_transfer(&txn, user, id).await?;
            if transfer_keys(user, &existing)? == held {
                return Ok((guard, txn, existing));
            }
            debug!(user_id = %user, transfer_id = %id, "Transfer moved while locking, retrying");
            seen = existing;
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    async fn resolve(
        &self,
        user: UserId,
        kind: CategoryKind,
        draft: &MovementDraft,
    ) -> Result<ResolvedMovement, MovementError> {
        let account = match draft.pool.account_id() {
            Some(id) => AccountRepository::fetch_info(&self.db, id).await?,
            None => None,
        };
        let category = match draft.category_id {
            Some(id) => CategoryRepository::fetch_info(&self.db, id).await?,
            None => None,
        };

        Ok(LedgerService::resolve_movement(
            user,
            kind,
            draft,
            account.as_ref(),
            category.as_ref(),
        )?)
    }

    async fn resolve_transfer(
        &self,
        user: UserId,
        draft: &TransferDraft,
    ) -> Result<ResolvedTransfer, MovementError> {
        let from = match draft.from.account_id() {
            Some(id) => AccountRepository::fetch_info(&self.db, id).await?,
            None => None,
        };
        let to = match draft.to.account_id() {
            Some(id) => AccountRepository::fetch_info(&self.db, id).await?,
            None => None,
        };

        Ok(LedgerService::resolve_transfer(
            user,
            draft,
            from.as_ref(),
            to.as_ref(),
        )?)
    }
}

const fn key(user: UserId, pool: Pool, currency: Currency) -> PoolKey {
    PoolKey::new(user, pool, currency)
}

/// Recomputes the source balance on `conn` and rejects a debit it cannot cover.
async fn ensure_funds<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
    pool: Pool,
    currency: Currency,
    amount: Decimal,
    prior: Option<&PriorDebit>,
) -> Result<(), MovementError> {
    let balance = BalanceRepository::compute_on(conn, user, pool, currency).await?;
    LedgerService::check_funds(amount, &balance, prior)?;
    Ok(())
}

fn income_key(user: UserId, income: &incomes::Model) -> Result<PoolKey, DbErr> {
    Ok(key(user, income.pool()?, income.currency()?))
}

fn transfer_keys(user: UserId, transfer: &transfers::Model) -> Result<[PoolKey; 2], DbErr> {
    let record = transfer.record()?;
    Ok([
        key(user, record.from, record.currency),
        key(user, record.to, record.currency),
    ])
}

/// Balance of a pool about to lose a credit.
///
/// `None` when the pool's account is gone: a deleted account's balance is
/// no longer guarded.
async fn credited_balance<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
    pool: Pool,
    currency: Currency,
) -> Result<Option<PoolBalance>, MovementError> {
    match BalanceRepository::compute_on(conn, user, pool, currency).await {
        Ok(balance) => Ok(Some(balance)),
        Err(MovementError::Ledger(LedgerError::InvalidAccount(_))) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Recomputes a pool that lost a credit in this transaction and rejects the
/// write if it left the pool overdrawn.
async fn ensure_credit_kept<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
    before: Option<PoolBalance>,
) -> Result<(), MovementError> {
    let Some(before) = before else {
        return Ok(());
    };
    let after = BalanceRepository::compute_on(conn, user, before.pool, before.currency).await?;
    LedgerService::check_credit_removal(&before, &after)?;
    Ok(())
}

fn minor_units(amount: Decimal) -> Result<i64, LedgerError> {
    to_minor_units(amount)
        .ok_or_else(|| LedgerError::InvalidAmount(format!("{amount} is out of range")))
}

fn rejected(operation: &'static str, user: UserId, err: &MovementError) {
    warn!(
        user_id = %user,
        operation,
        code = err.error_code(),
        error = %err,
        "Movement rejected"
    );
}

async fn live_income<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
    id: IncomeId,
) -> Result<incomes::Model, MovementError> {
    incomes::Entity::find_live_owned(user)
        .filter(incomes::Column::Id.eq(id.into_inner()))
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::NotFound(id.into_inner()).into())
}

async fn live_expense<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
    id: ExpenseId,
) -> Result<expenses::Model, MovementError> {
    expenses::Entity::find_live_owned(user)
        .filter(expenses::Column::Id.eq(id.into_inner()))
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::NotFound(id.into_inner()).into())
}

async fn live_transfer<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
    id: TransferId,
) -> Result<transfers::Model, MovementError> {
    transfers::Entity::find_live_owned(user)
        .filter(transfers::Column::Id.eq(id.into_inner()))
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::NotFound(id.into_inner()).into())
}
