//! Pending transaction type consumed by the pool

use bytes::Bytes;
use forge_primitives::{H256, Nonce, PublicKey, U256};

/// A pending transaction.
///
/// The pool treats most of the content as opaque: it reads the identifier,
/// the sender public key, the nonce, and the fee fields, and measures the
/// encoded size. Signatures and balances are checked by the injected
/// validator callback, not here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Stable unique identifier
    pub id: H256,
    /// Sender public key; the sender address is derived from it
    pub sender_public_key: PublicKey,
    /// Per-sender monotonic sequence number
    pub nonce: Nonce,
    /// Fee offered by the sender
    pub fee: U256,
    /// Minimum fee required for this transaction shape
    pub min_fee: U256,
    /// Opaque payload
    pub payload: Bytes,
}

impl Transaction {
    /// Encoded size in bytes.
    ///
    /// Matches `codec::encode_transaction(self).len()` without allocating;
    /// always greater than zero because of the fixed-width header.
    pub fn size(&self) -> usize {
        crate::codec::encoded_len(self)
    }

    /// Fee priority: `(fee - min_fee) / size`, on unsigned big integers with
    /// division truncating toward zero.
    ///
    /// This is the sole cross-sender ordering key for admission and
    /// eviction. A fee below `min_fee` saturates to priority zero.
    pub fn fee_priority(&self) -> U256 {
        let surplus = self.fee.checked_sub(self.min_fee).unwrap_or_else(U256::zero);
        surplus / U256::from(self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx_with(fee: u64, min_fee: u64, payload_len: usize) -> Transaction {
        Transaction {
            id: H256::from_bytes([1u8; 32]),
            sender_public_key: PublicKey::from_bytes([2u8; 32]),
            nonce: 0,
            fee: U256::from(fee),
            min_fee: U256::from(min_fee),
            payload: Bytes::from(vec![0u8; payload_len]),
        }
    }

    #[test]
    fn test_size_tracks_payload() {
        let small = tx_with(0, 0, 0);
        let large = tx_with(0, 0, 100);
        assert_eq!(large.size(), small.size() + 100);
        assert!(small.size() > 0);
    }

    #[test]
    fn test_fee_priority_truncates() {
        let tx = tx_with(0, 0, 0);
        let size = tx.size() as u64;

        // surplus = size + 1 -> priority 1 after truncation
        let tx = tx_with(size + 1, 0, 0);
        assert_eq!(tx.fee_priority(), U256::from(1u64));

        // surplus just below size -> priority 0
        let tx = tx_with(size - 1, 0, 0);
        assert_eq!(tx.fee_priority(), U256::zero());
    }

    #[test]
    fn test_fee_priority_exact_multiple() {
        let size = tx_with(0, 0, 0).size() as u64;
        let tx = tx_with(10 + 7 * size, 10, 0);
        assert_eq!(tx.fee_priority(), U256::from(7u64));
    }

    #[test]
    fn test_fee_below_min_fee_saturates() {
        let tx = tx_with(5, 100, 0);
        assert_eq!(tx.fee_priority(), U256::zero());
    }
}
