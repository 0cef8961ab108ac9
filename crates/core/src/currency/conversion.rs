//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Conversions never round; sums of converted values stay exact
//! - Rounding happens once, at the display boundary
//! - Use banker's rounding (round half to even)

use caja_shared::config::LedgerConfig;
use caja_shared::types::Currency;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::ledger::LedgerError;

/// Local units per foreign unit used when nothing else is configured.
pub const DEFAULT_EXCHANGE_RATE: Decimal = Decimal::from_parts(367, 0, 0, false, 1);

/// Converts amounts between the local and the foreign currency at a fixed rate.
///
/// `rate` is the number of local units (NIO) one foreign unit (USD) buys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyConverter {
    rate: Decimal,
}

impl CurrencyConverter {
    /// Creates a converter for the given rate.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidExchangeRate` if the rate is not positive.
    pub fn try_new(rate: Decimal) -> Result<Self, LedgerError> {
        if rate <= Decimal::ZERO {
            return Err(LedgerError::InvalidExchangeRate);
        }
        Ok(Self { rate })
    }

    /// Builds a converter from the ledger section of the app configuration.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidExchangeRate` if the configured rate is not positive.
    pub fn from_config(config: &LedgerConfig) -> Result<Self, LedgerError> {
        Self::try_new(config.exchange_rate)
    }

    /// The configured rate.
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        self.rate
    }

    /// Expresses `amount` (held in `currency`) in the local currency.
    #[must_use]
    pub fn to_local(&self, amount: Decimal, currency: Currency) -> Decimal {
        if currency == Currency::LOCAL {
            amount
        } else {
            amount * self.rate
        }
    }

    /// Expresses `amount` (held in `currency`) in the foreign currency.
    #[must_use]
    pub fn to_foreign(&self, amount: Decimal, currency: Currency) -> Decimal {
        if currency == Currency::FOREIGN {
            amount
        } else {
            amount / self.rate
        }
    }

    /// Converts `amount` from one currency to another.
    #[must_use]
    pub fn convert(&self, amount: Decimal, from: Currency, to: Currency) -> Decimal {
        if to == Currency::LOCAL {
            self.to_local(amount, from)
        } else {
            self.to_foreign(amount, from)
        }
    }
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self {
            rate: DEFAULT_EXCHANGE_RATE,
        }
    }
}

/// Rounds an amount to two decimals for display, half to even.
#[must_use]
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
