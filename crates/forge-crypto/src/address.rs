//! Address derivation from sender public keys

use crate::hash::keccak256;
use forge_primitives::{Address, PublicKey};

/// Derive the account address for a sender public key.
///
/// The address is the last 20 bytes of the Keccak-256 digest of the raw key
/// bytes. The mapping is pure; the pool computes it once per admitted
/// transaction and caches the result.
pub fn address_of(public_key: &PublicKey) -> Address {
    let digest = keccak256(public_key.as_bytes());
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&digest.as_bytes()[12..]);
    Address::from_bytes(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_stable() {
        let pk = PublicKey::from_bytes([7u8; 32]);
        assert_eq!(address_of(&pk), address_of(&pk));
    }

    #[test]
    fn test_distinct_keys_distinct_addresses() {
        let a = address_of(&PublicKey::from_bytes([1u8; 32]));
        let b = address_of(&PublicKey::from_bytes([2u8; 32]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_address_is_digest_tail() {
        let pk = PublicKey::from_bytes([0xaa; 32]);
        let digest = keccak256(pk.as_bytes());
        let addr = address_of(&pk);
        assert_eq!(&digest.as_bytes()[12..], addr.as_bytes());
    }
}
