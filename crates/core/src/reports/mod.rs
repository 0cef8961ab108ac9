//! Movement summaries.
//!
//! This module provides pure business logic for summarizing a user's ledger:
//! - Totals per currency
//! - Totals per pool kind, in local currency
//! - Monthly series with carry-forward
//! - Per-account balance breakdown

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
