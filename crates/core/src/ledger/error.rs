//! Ledger error types for movement validation.
//!
//! Every variant is a business-rule failure detected before anything is
//! written. Storage failures never appear here; the persistence layer keeps
//! them in its own error types.

use caja_shared::AppError;
use caja_shared::types::Currency;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while validating a movement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Reference Errors ==========
    /// Referenced account is missing, deleted, or owned by someone else.
    #[error("Invalid account: {0}")]
    InvalidAccount(Uuid),

    /// Referenced category is missing, deleted, foreign, or of the wrong kind.
    #[error("Invalid category: {0}")]
    InvalidCategory(Uuid),

    /// Movement or account to edit does not exist for this user.
    #[error("Not found: {0}")]
    NotFound(Uuid),

    // ========== Transfer Errors ==========
    /// Both sides of a transfer are bank accounts with different currencies.
    #[error("Currency mismatch between source ({from}) and destination ({to})")]
    CurrencyMismatch {
        /// Currency of the source account.
        from: Currency,
        /// Currency of the destination account.
        to: Currency,
    },

    /// Source and destination of a transfer are the same pool.
    #[error("Source and destination must be different")]
    SameAccount,

    // ========== Balance Errors ==========
    /// Debit would overdraw the source pool.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Balance available in the source pool.
        available: Decimal,
        /// Amount the movement asked for.
        requested: Decimal,
    },

    // ========== Input Errors ==========
    /// Amount could not be parsed, is negative, or has more than two decimals.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Exchange rate must be positive.
    #[error("Exchange rate must be positive")]
    InvalidExchangeRate,

    /// Stored pool columns do not describe a valid pool.
    #[error("Invalid pool: {0}")]
    InvalidPool(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAccount(_) => "INVALID_ACCOUNT",
            Self::InvalidCategory(_) => "INVALID_CATEGORY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::SameAccount => "SAME_ACCOUNT",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidExchangeRate => "INVALID_EXCHANGE_RATE",
            Self::InvalidPool(_) => "INVALID_POOL",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - the request itself is wrong
            Self::InvalidAccount(_)
            | Self::InvalidCategory(_)
            | Self::CurrencyMismatch { .. }
            | Self::SameAccount
            | Self::InvalidAmount(_)
            | Self::InvalidExchangeRate => 400,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 422 Unprocessable - valid request, but the ledger cannot honour it
            Self::InsufficientBalance { .. } => 422,

            // 500 Internal Server Error - stored data is inconsistent
            Self::InvalidPool(_) => 500,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(_) => Self::NotFound(err.to_string()),
            LedgerError::InsufficientBalance { .. } => Self::BusinessRule(err.to_string()),
            LedgerError::InvalidPool(_) => Self::Internal(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::InvalidAccount(Uuid::nil()).error_code(), "INVALID_ACCOUNT");
        assert_eq!(LedgerError::SameAccount.error_code(), "SAME_ACCOUNT");
        assert_eq!(
            LedgerError::CurrencyMismatch {
                from: Currency::Usd,
                to: Currency::Nio,
            }
            .error_code(),
            "CURRENCY_MISMATCH"
        );
        assert_eq!(
            LedgerError::InsufficientBalance {
                available: dec!(0),
                requested: dec!(1),
            }
            .error_code(),
            "INSUFFICIENT_BALANCE"
        );
        assert_eq!(LedgerError::InvalidCategory(Uuid::nil()).error_code(), "INVALID_CATEGORY");
        assert_eq!(LedgerError::NotFound(Uuid::nil()).error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::SameAccount.http_status_code(), 400);
        assert_eq!(LedgerError::NotFound(Uuid::nil()).http_status_code(), 404);
        assert_eq!(
            LedgerError::InsufficientBalance {
                available: dec!(0),
                requested: dec!(1),
            }
            .http_status_code(),
            422
        );
        assert_eq!(LedgerError::InvalidPool("bank".into()).http_status_code(), 500);
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InsufficientBalance {
            available: Decimal::new(1000, 2),
            requested: Decimal::new(2550, 2),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: available 10.00, requested 25.50"
        );

        let err = LedgerError::CurrencyMismatch {
            from: Currency::Usd,
            to: Currency::Nio,
        };
        assert_eq!(
            err.to_string(),
            "Currency mismatch between source (USD) and destination (NIO)"
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = LedgerError::NotFound(Uuid::nil()).into();
        assert_eq!(app.status_code(), 404);

        let app: AppError = LedgerError::InsufficientBalance {
            available: dec!(0),
            requested: dec!(1),
        }
        .into();
        assert_eq!(app.error_code(), "BUSINESS_RULE_VIOLATION");

        let app: AppError = LedgerError::SameAccount.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }
}
