//! Account repository for bank account database operations.

use caja_core::ledger::{AccountInfo, LedgerError, Pool, PoolBalance, RawAmount};
use caja_shared::AppError;
use caja_shared::types::money::{from_minor_units, to_minor_units};
use caja_shared::types::{AccountId, Currency, UserId};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::ledger::LedgerRepository;
use crate::entities::accounts;
use crate::locks::{PoolKey, PoolLocks};
use crate::soft_delete::SoftDelete;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found, deleted, or owned by someone else.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Business rule violation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Ledger(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => Self::NotFound(err.to_string()),
            AccountError::Ledger(err) => err.into(),
            AccountError::Database(err) => Self::Database(err.to_string()),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owner.
    pub user_id: UserId,
    /// Display name.
    pub name: Option<String>,
    /// Bank or institution.
    pub institution: Option<String>,
    /// Account currency; fixed for the life of the account.
    pub currency: Currency,
    /// Opening balance.
    pub initial_balance: Option<RawAmount>,
}

/// Input for updating an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Display name.
    pub name: Option<Option<String>>,
    /// Bank or institution.
    pub institution: Option<Option<String>>,
    /// Opening balance.
    pub initial_balance: Option<Option<RawAmount>>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
    locks: PoolLocks,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_locks(db, PoolLocks::new())
    }

    /// Creates a repository sharing pool locks with a movement repository.
    #[must_use]
    pub const fn with_locks(db: DatabaseConnection, locks: PoolLocks) -> Self {
        Self { db, locks }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if the opening balance is not a
    /// non-negative two-decimal amount.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let initial_balance_minor = input
            .initial_balance
            .as_ref()
            .map(parse_minor)
            .transpose()?;

        let now = Utc::now();
        let account = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            user_id: Set(input.user_id.into_inner()),
            name: Set(input.name),
            institution: Set(input.institution),
            currency: Set(input.currency.code().to_string()),
            initial_balance_minor: Set(initial_balance_minor),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(
            user_id = %input.user_id,
            account_id = %account.id,
            currency = %account.currency,
            "Account created"
        );
        Ok(account)
    }

    /// Lists the user's live accounts, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(&self, user: UserId) -> Result<Vec<accounts::Model>, AccountError> {
        let accounts = accounts::Entity::find_live_owned(user)
            .order_by_asc(accounts::Column::Name)
            .order_by_asc(accounts::Column::Id)
            .all(&self.db)
            .await?;
        Ok(accounts)
    }

    /// Finds one of the user's live accounts.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account is missing, deleted,
    /// or owned by another user.
    pub async fn find_account(
        &self,
        user: UserId,
        id: AccountId,
    ) -> Result<accounts::Model, AccountError> {
        Self::find_owned_on(&self.db, user, id).await
    }

    /// Updates name, institution, or opening balance.
    ///
    /// A new opening balance must still cover every movement already on the
    /// account, else the update fails with `InsufficientBalance`.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` for an unknown account, or a
    /// `LedgerError` if the new opening balance is invalid or too small.
    pub async fn update_account(
        &self,
        user: UserId,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let result = self.apply_update(user, id, input).await;
        if let Err(err) = &result {
            warn!(
                user_id = %user,
                account_id = %id,
                code = err.error_code(),
                error = %err,
                "Account update rejected"
            );
        }
        result
    }

    async fn apply_update(
        &self,
        user: UserId,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let existing = Self::find_owned_on(&self.db, user, id).await?;
        let info = existing.info()?;

        let new_initial = input
            .initial_balance
            .as_ref()
            .map(|raw| raw.as_ref().map(parse_minor).transpose())
            .transpose()?;

        let _guard = if new_initial.is_some() {
            Some(
                self.locks
                    .lock([PoolKey::new(user, Pool::Bank(id), info.currency)])
                    .await,
            )
        } else {
            None
        };

        let txn = self.db.begin().await?;

        if let Some(minor) = new_initial {
            let pool = Pool::Bank(id);
            let ledger = LedgerRepository::load_on(&txn, user, pool, info.currency).await?;
            let candidate = AccountInfo {
                initial_balance: minor.map(from_minor_units),
                ..info.clone()
            };
            let balance = PoolBalance::compute(pool, info.currency, &ledger, Some(&candidate));
            if balance.is_overdrawn() {
                let available = candidate.initial_balance.unwrap_or(Decimal::ZERO);
                return Err(LedgerError::InsufficientBalance {
                    available,
                    requested: available - balance.balance,
                }
                .into());
            }
        }

        let mut active: accounts::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(institution) = input.institution {
            active.institution = Set(institution);
        }
        if let Some(minor) = new_initial {
            active.initial_balance_minor = Set(minor);
        }
        active.updated_at = Set(Utc::now());

        let account = active.update(&txn).await?;
        txn.commit().await?;

        info!(user_id = %user, account_id = %id, "Account updated");
        Ok(account)
    }

    /// Soft-deletes an account.
    ///
    /// Movements that reference the account are left in place.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` for an unknown account.
    pub async fn delete_account(&self, user: UserId, id: AccountId) -> Result<(), AccountError> {
        let existing = Self::find_owned_on(&self.db, user, id).await?;

        let mut active: accounts::ActiveModel = existing.into();
        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await?;

        info!(user_id = %user, account_id = %id, "Account deleted");
        Ok(())
    }

    /// Loads any account by id, deleted or not, for movement validation.
    ///
    /// Ownership and liveness are left to the validator so that it can
    /// report `InvalidAccount`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_info<C: ConnectionTrait>(
        conn: &C,
        id: AccountId,
    ) -> Result<Option<AccountInfo>, DbErr> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(conn)
            .await?
            .map(|account| account.info())
            .transpose()
    }

    async fn find_owned_on<C: ConnectionTrait>(
        conn: &C,
        user: UserId,
        id: AccountId,
    ) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_live_owned(user)
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .one(conn)
            .await?
            .ok_or(AccountError::NotFound(id.into_inner()))
    }
}

fn parse_minor(raw: &RawAmount) -> Result<i64, LedgerError> {
    let amount = raw.parse()?;
    to_minor_units(amount)
        .ok_or_else(|| LedgerError::InvalidAmount(format!("{amount} is out of range")))
}
