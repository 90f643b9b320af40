//! # forge-txpool
//!
//! Transaction pool for ForgeLedger.
//!
//! This crate provides:
//! - Admission with an entrance fee-priority floor and capacity arbitration
//! - Per-sender nonce sequencing with processable/unprocessable partitions
//! - Same-nonce replacement gated by a fee difference
//! - Unprocessable-first eviction when the pool is full
//! - Periodic reorganization driven by an injected validator callback
//! - Periodic expiration of aged transactions
//!
//! ## Architecture
//!
//! ```text
//! +----------------------+
//! |   TransactionPool    |
//! +----------------------+
//!           |
//! +---------+----------------------+
//! | per-sender TransactionList     |  <- nonce -> tx, processable prefix
//! +---------+----------------------+
//!           |
//! +----------------------+   +----------------------+
//! |   By Id Index        |   |   FeePriorityQueue   |
//! +----------------------+   +----------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use forge_txpool::{PoolConfig, TransactionPool};
//!
//! let pool = Arc::new(TransactionPool::new(PoolConfig::default(), applier));
//! pool.add(tx).await?;
//! pool.start();
//! let processable = pool.get_processable_transactions();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod clock;
mod config;
mod error;
mod events;
mod job;
mod pool;
mod priority_queue;
mod sender_list;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PoolConfig;
pub use error::{TxPoolError, TxPoolResult};
pub use events::{EventBus, PoolEvent, RemoveReason};
pub use pool::{ApplyError, ApplyTransactions, PooledTransaction, TransactionPool};
pub use priority_queue::FeePriorityQueue;
pub use sender_list::{Evicted, TransactionList};
