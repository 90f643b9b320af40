//! # forge-crypto
//!
//! Keccak-256 hashing and address derivation for ForgeLedger.
//!
//! Signature creation and verification happen outside this workspace; the
//! transaction pool only needs the pure mapping from a sender public key to
//! its account address.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::address_of;
pub use hash::keccak256;
