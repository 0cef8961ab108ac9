//! Property-based tests for currency conversion.

use caja_shared::types::Currency;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::CurrencyConverter;

/// Strategy to generate amounts from 0.00 to 10,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: converting local to foreign and back returns the original
    /// amount, up to the precision lost in the division.
    #[test]
    fn prop_round_trip_local_foreign(x in amount(), rate in positive_rate()) {
        let fx = CurrencyConverter::try_new(rate).unwrap();
        let back = fx.to_local(fx.to_foreign(x, Currency::Nio), Currency::Usd);
        let tolerance = Decimal::new(1, 8);
        prop_assert!((back - x).abs() <= tolerance, "x={} back={}", x, back);
    }

    /// Property: converting into the currency an amount is already held in
    /// is the identity.
    #[test]
    fn prop_same_currency_is_identity(x in amount(), rate in positive_rate()) {
        let fx = CurrencyConverter::try_new(rate).unwrap();
        prop_assert_eq!(fx.to_local(x, Currency::Nio), x);
        prop_assert_eq!(fx.to_foreign(x, Currency::Usd), x);
    }

    /// Property: conversion is additive, so converting a sum equals summing
    /// the converted parts.
    #[test]
    fn prop_to_local_is_additive(a in amount(), b in amount(), rate in positive_rate()) {
        let fx = CurrencyConverter::try_new(rate).unwrap();
        prop_assert_eq!(
            fx.to_local(a + b, Currency::Usd),
            fx.to_local(a, Currency::Usd) + fx.to_local(b, Currency::Usd)
        );
    }
}
