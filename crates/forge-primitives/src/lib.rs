//! # forge-primitives
//!
//! Primitive types for the ForgeLedger blockchain.
//!
//! This crate provides the fundamental data types shared across the system:
//! addresses, transaction identifiers, sender public keys, and the big
//! unsigned integer type used for fees.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod public_key;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{H256, HashError};
pub use public_key::{PublicKey, PublicKeyError};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Transaction nonce type
pub type Nonce = u64;
