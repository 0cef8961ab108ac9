//! Application-wide error types.

use thiserror::Error;

/// Application error types.
///
/// Domain errors from the ledger and report layers are folded into these
/// before they leave the library.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the failure comes from the storage layer rather than
    /// from a business rule.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
