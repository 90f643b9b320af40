//! # forge-types
//!
//! Core transaction types for ForgeLedger.
//!
//! This crate provides:
//! - [`Transaction`](transaction::Transaction) - the pending transaction consumed by the pool
//! - [`codec`] - deterministic binary encoding (the source of `size()`)
//! - [`TxVerdict`](verdict::TxVerdict) - per-transaction validator verdicts

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod transaction;
pub mod verdict;

// Re-export commonly used types
pub use transaction::Transaction;
pub use verdict::{TxVerdict, VerdictError};
