//! Report repository: loads a user's live movements and summarizes them.

use caja_core::currency::CurrencyConverter;
use caja_core::reports::{
    AccountSnapshot, ReportData, ReportError, ReportRequest, ReportService, Summary,
};
use caja_shared::AppError;
use caja_shared::types::UserId;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use tracing::debug;

use crate::entities::{accounts, expenses, incomes, transfers};
use crate::soft_delete::SoftDelete;

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportQueryError {
    /// Invalid request.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReportQueryError> for AppError {
    fn from(err: ReportQueryError) -> Self {
        match err {
            ReportQueryError::Report(err) => err.into(),
            ReportQueryError::Database(err) => Self::Database(err.to_string()),
        }
    }
}

/// Repository producing summaries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
    fx: CurrencyConverter,
}

impl ReportRepository {
    /// Creates a new report repository converting at `fx`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, fx: CurrencyConverter) -> Self {
        Self { db, fx }
    }

    /// Summarizes the user's live movements for `request`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `from` is after `to`, or a
    /// database error.
    pub async fn summarize(
        &self,
        user: UserId,
        request: &ReportRequest,
    ) -> Result<Summary, ReportQueryError> {
        ReportService::validate_range(request)?;

        let data = self.load(user, request).await?;
        debug!(
            user_id = %user,
            incomes = data.incomes.len(),
            expenses = data.expenses.len(),
            transfers = data.transfers.len(),
            accounts = data.accounts.len(),
            "Report data loaded"
        );

        Ok(ReportService::summarize(request, &data, &self.fx)?)
    }

    async fn load(&self, user: UserId, request: &ReportRequest) -> Result<ReportData, DbErr> {
        let incomes = incomes::Entity::find_live_owned(user)
            .filter(in_range(incomes::Column::Date, request))
            .all(&self.db)
            .await?;
        let expenses = expenses::Entity::find_live_owned(user)
            .filter(in_range(expenses::Column::Date, request))
            .all(&self.db)
            .await?;
        let transfers = transfers::Entity::find_live_owned(user)
            .filter(in_range(transfers::Column::Date, request))
            .all(&self.db)
            .await?;
        let accounts = accounts::Entity::find_live_owned(user).all(&self.db).await?;

        Ok(ReportData {
            incomes: incomes
                .iter()
                .map(incomes::Model::record)
                .collect::<Result<_, _>>()?,
            expenses: expenses
                .iter()
                .map(expenses::Model::record)
                .collect::<Result<_, _>>()?,
            transfers: transfers
                .iter()
                .map(transfers::Model::record)
                .collect::<Result<_, _>>()?,
            accounts: accounts
                .iter()
                .map(snapshot)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Narrows a bounded request in SQL. Undated rows never fall in a bounded
/// range, so they are only loaded for unbounded requests.
fn in_range<C: ColumnTrait>(column: C, request: &ReportRequest) -> Condition {
    if request.is_unbounded() {
        return Condition::all();
    }
    let mut condition = Condition::all().add(column.is_not_null());
    if let Some(from) = request.from {
        condition = condition.add(column.gte(from));
    }
    if let Some(to) = request.to {
        condition = condition.add(column.lte(to));
    }
    condition
}

fn snapshot(account: &accounts::Model) -> Result<AccountSnapshot, DbErr> {
    let info = account.info()?;
    Ok(AccountSnapshot {
        id: info.id,
        name: account.name.clone(),
        institution: account.institution.clone(),
        currency: info.currency,
        initial_balance: info.initial_balance,
    })
}
