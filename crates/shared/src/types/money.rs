//! Currencies and the minor-unit representation of stored amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` in memory and `i64` minor units (cents) at rest.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of decimal places every stored amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Currencies a ledger can hold.
///
/// `Nio` is the local currency, `Usd` the foreign one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Nicaraguan Córdoba (local)
    Nio,
    /// US Dollar (foreign)
    Usd,
}

impl Currency {
    /// The local currency. Totals by pool kind are expressed in it.
    pub const LOCAL: Self = Self::Nio;

    /// The foreign currency.
    pub const FOREIGN: Self = Self::Usd;

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Nio => "NIO",
            Self::Usd => "USD",
        }
    }

    /// Normalizes a client-supplied currency code.
    ///
    /// Absent or unrecognized codes fall back to [`Currency::LOCAL`].
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        raw.and_then(|code| code.trim().parse().ok())
            .unwrap_or(Self::LOCAL)
    }
}

/// Converts an amount into minor units for storage.
///
/// Returns `None` when the amount has significant digits beyond
/// [`MONEY_SCALE`] or does not fit in an `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    if amount.normalize().scale() > MONEY_SCALE {
        return None;
    }
    let mut scaled = amount;
    scaled.rescale(MONEY_SCALE);
    i64::try_from(scaled.mantissa()).ok()
}

/// Converts stored minor units back into an amount with two decimals.
#[must_use]
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MONEY_SCALE)
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NIO" => Ok(Self::Nio),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Nio.to_string(), "NIO");
        assert_eq!(Currency::Usd.to_string(), "USD");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("NIO").unwrap(), Currency::Nio);
        assert!(Currency::from_str("EUR").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[rstest]
    #[case(Some("USD"), Currency::Usd)]
    #[case(Some(" usd "), Currency::Usd)]
    #[case(Some("nio"), Currency::Nio)]
    #[case(Some("EUR"), Currency::Nio)]
    #[case(Some(""), Currency::Nio)]
    #[case(None, Currency::Nio)]
    fn test_currency_normalize(#[case] raw: Option<&str>, #[case] expected: Currency) {
        assert_eq!(Currency::normalize(raw), expected);
    }

    #[test]
    fn test_currency_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Currency::Nio).unwrap(), "\"NIO\"");
        let parsed: Currency = serde_json::from_str("\"USD\"").unwrap();
        assert_eq!(parsed, Currency::Usd);
    }

    #[rstest]
    #[case(dec!(12.34), Some(1234))]
    #[case(dec!(12), Some(1200))]
    #[case(dec!(12.5), Some(1250))]
    #[case(dec!(12.500), Some(1250))]
    #[case(dec!(0), Some(0))]
    #[case(dec!(-3.10), Some(-310))]
    #[case(dec!(12.345), None)]
    fn test_to_minor_units(#[case] amount: Decimal, #[case] expected: Option<i64>) {
        assert_eq!(to_minor_units(amount), expected);
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(1234), dec!(12.34));
        assert_eq!(from_minor_units(0), Decimal::ZERO);
        assert_eq!(from_minor_units(-5), dec!(-0.05));
    }
}
