//! Multi-pool balance and movement validation logic.
//!
//! This module implements the core ledger functionality:
//! - Pools (cash or a bank account)
//! - Ledger rows read back per pool and currency
//! - Balance calculations
//! - Business rule validation for incomes, expenses, and transfers
//! - Error types for ledger operations

pub mod balance;
pub mod entry;
pub mod error;
pub mod pool;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{PoolBalance, initial_balance};
pub use entry::{Ledger, LedgerRow};
pub use error::LedgerError;
pub use pool::{Pool, PoolKind};
pub use service::LedgerService;
pub use types::{
    AccountInfo, CategoryInfo, CategoryKind, MovementDraft, PriorDebit, RawAmount,
    ResolvedMovement, ResolvedTransfer, TransferDraft,
};
