//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod balance;
pub mod category;
pub mod ledger;
pub mod movement;
pub mod report;

pub use account::{AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use balance::BalanceRepository;
pub use category::{CategoryError, CategoryRepository, CreateCategoryInput};
pub use ledger::LedgerRepository;
pub use movement::{MovementError, MovementFilter, MovementRepository};
pub use report::{ReportQueryError, ReportRepository};
