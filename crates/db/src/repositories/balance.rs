//! Balance repository: a pool's balance, recomputed from its ledger.

use caja_core::ledger::{Pool, PoolBalance, validation::pool_account};
use caja_shared::types::{Currency, UserId};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::debug;

use super::account::AccountRepository;
use super::ledger::LedgerRepository;
use super::movement::MovementError;

/// Repository computing pool balances. Nothing is cached.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Balance of `pool` in `currency`:
    /// `initial + incomes + transfers_in - expenses - transfers_out`.
    ///
    /// The opening balance only counts when the pool is a bank account whose
    /// currency is `currency`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAccount` if a bank pool does not name a
    /// live account of `user`.
    pub async fn compute_balance(
        &self,
        user: UserId,
        pool: Pool,
        currency: Currency,
    ) -> Result<PoolBalance, MovementError> {
        Self::compute_on(&self.db, user, pool, currency).await
    }

    /// Same as [`BalanceRepository::compute_balance`], on any connection.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAccount` if a bank pool does not name a
    /// live account of `user`.
    pub async fn compute_on<C: ConnectionTrait>(
        conn: &C,
        user: UserId,
        pool: Pool,
        currency: Currency,
    ) -> Result<PoolBalance, MovementError> {
        let account = match pool.account_id() {
            Some(id) => AccountRepository::fetch_info(conn, id).await?,
            None => None,
        };
        let account = pool_account(pool, user, account.as_ref())?;

        let ledger = LedgerRepository::load_on(conn, user, pool, currency).await?;
        let balance = PoolBalance::compute(pool, currency, &ledger, account);

        debug!(
            user_id = %user,
            pool = %pool,
            currency = %currency,
            balance = %balance.balance,
            "Balance computed"
        );
        Ok(balance)
    }
}
