//! Binary encoding/decoding for transactions.
//!
//! Provides the deterministic serialization whose byte length feeds the
//! fee-priority computation. Layout: fixed-width little-endian header
//! followed by a length-prefixed payload.

use crate::transaction::Transaction;
use bytes::Bytes;
use forge_primitives::{H256, PublicKey, U256};

/// Fixed header length: id (32) + public key (32) + nonce (8) + fee (32) +
/// min_fee (32) + payload length prefix (4).
pub const HEADER_LEN: usize = 32 + 32 + 8 + 32 + 32 + 4;

/// Encoded length of a transaction without encoding it.
pub fn encoded_len(tx: &Transaction) -> usize {
    HEADER_LEN + tx.payload.len()
}

/// Encode a transaction to bytes.
pub fn encode_transaction(tx: &Transaction) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(tx));
    buf.extend_from_slice(tx.id.as_bytes()); // 32
    buf.extend_from_slice(tx.sender_public_key.as_bytes()); // 32
    buf.extend_from_slice(&tx.nonce.to_le_bytes()); // 8
    buf.extend_from_slice(&u256_le(&tx.fee)); // 32
    buf.extend_from_slice(&u256_le(&tx.min_fee)); // 32
    buf.extend_from_slice(&(tx.payload.len() as u32).to_le_bytes()); // 4
    buf.extend_from_slice(&tx.payload); // variable
    buf
}

/// Decode a transaction from bytes.
pub fn decode_transaction(bytes: &[u8]) -> Option<Transaction> {
    if bytes.len() < HEADER_LEN {
        return None;
    }
    let mut pos = 0;

    let id = H256::from_slice(&bytes[pos..pos + 32]).ok()?;
    pos += 32;
    let sender_public_key = PublicKey::from_slice(&bytes[pos..pos + 32]).ok()?;
    pos += 32;
    let nonce = u64::from_le_bytes(bytes[pos..pos + 8].try_into().ok()?);
    pos += 8;
    let fee = U256::from_little_endian(&bytes[pos..pos + 32]);
    pos += 32;
    let min_fee = U256::from_little_endian(&bytes[pos..pos + 32]);
    pos += 32;

    let payload_len = u32::from_le_bytes(bytes[pos..pos + 4].try_into().ok()?) as usize;
    pos += 4;
    if bytes.len() != pos + payload_len {
        return None;
    }
    let payload = Bytes::copy_from_slice(&bytes[pos..pos + payload_len]);

    Some(Transaction {
        id,
        sender_public_key,
        nonce,
        fee,
        min_fee,
        payload,
    })
}

fn u256_le(value: &U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_little_endian(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> Transaction {
        Transaction {
            id: H256::from_bytes([0x11; 32]),
            sender_public_key: PublicKey::from_bytes([0x22; 32]),
            nonce: 42,
            fee: U256::from(1_000_000u64),
            min_fee: U256::from(500u64),
            payload: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
        }
    }

    #[test]
    fn test_roundtrip() {
        let tx = sample_tx();
        let encoded = encode_transaction(&tx);
        let decoded = decode_transaction(&encoded).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn test_encoded_len_matches() {
        let tx = sample_tx();
        assert_eq!(encode_transaction(&tx).len(), encoded_len(&tx));
        assert_eq!(encoded_len(&tx), HEADER_LEN + 4);
    }

    #[test]
    fn test_decode_rejects_truncated() {
        let tx = sample_tx();
        let encoded = encode_transaction(&tx);
        assert!(decode_transaction(&encoded[..encoded.len() - 1]).is_none());
        assert!(decode_transaction(&encoded[..10]).is_none());
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let tx = sample_tx();
        let mut encoded = encode_transaction(&tx);
        encoded.push(0);
        assert!(decode_transaction(&encoded).is_none());
    }
}
