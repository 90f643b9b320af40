//! Transaction pool error types

use forge_primitives::{Address, Nonce, U256};
use thiserror::Error;

/// Transaction pool admission errors.
///
/// These are data-dependent rejections returned to the caller; they are
/// never panics. Invariant violations inside the pool are programmer error
/// and abort instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxPoolError {
    /// Fee priority below the entrance floor
    #[error("fee priority {priority} is below the entrance floor {minimum}")]
    InsufficientEntranceFee {
        /// Fee priority of the rejected transaction
        priority: U256,
        /// Configured admission floor
        minimum: U256,
    },

    /// Pool is full and no resident could be displaced
    #[error("transaction pool is full (max size: {0})")]
    PoolFull(usize),

    /// Per-sender list is full and the new nonce cannot displace anything
    #[error("transaction pool for account {0} is full")]
    PoolFullForAccount(Address),

    /// Same-nonce replacement offered too small a fee increase
    #[error("replacement fee too low: incumbent {incumbent}, offered {offered}, required {required}")]
    InsufficientReplacementFee {
        /// Fee of the transaction currently holding the nonce
        incumbent: U256,
        /// Fee offered by the replacement
        offered: U256,
        /// Minimum fee the replacement must offer
        required: U256,
    },

    /// Same-nonce conflict with a processable incumbent
    #[error("cannot replace processable transaction with nonce {0}")]
    ProcessableNonceLocked(Nonce),

    /// The validator rejected the transaction for a non-recoverable reason
    #[error("transaction rejected by state validation: {0}")]
    InvalidTransaction(String),
}

/// Result type for transaction pool operations
pub type TxPoolResult<T> = Result<T, TxPoolError>;
