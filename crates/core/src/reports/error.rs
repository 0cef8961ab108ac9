//! Report error types.

use caja_shared::AppError;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during summary generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::Validation(err.to_string())
    }
}
