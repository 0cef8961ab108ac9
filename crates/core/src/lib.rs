//! Core business logic for Caja.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Pools, balances, movement validation, and summaries live here; the `db`
//! crate feeds them rows and persists what they accept.
//!
//! # Modules
//!
//! - `currency` - Conversion between the local and foreign currency
//! - `ledger` - Pool balances and movement validation
//! - `reports` - Currency, pool, monthly, and per-account summaries

pub mod currency;
pub mod ledger;
pub mod reports;
