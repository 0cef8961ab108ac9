//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

#[cfg(test)]
mod pagination_tests;

pub use id::*;
pub use money::Currency;
pub use pagination::{PageMeta, PageRequest, PageResponse};
