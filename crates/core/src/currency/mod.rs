//! Currency conversion between the local (NIO) and foreign (USD) currency.

pub mod conversion;

#[cfg(test)]
mod props;

pub use conversion::{CurrencyConverter, DEFAULT_EXCHANGE_RATE, round_for_display};
