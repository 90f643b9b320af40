//! Sender public key bytes (32 bytes)

use std::fmt;
use thiserror::Error;

/// Public key parsing error
#[derive(Debug, Error)]
pub enum PublicKeyError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid public key length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// 32-byte sender public key.
///
/// The pool never verifies signatures; it only carries the key bytes and
/// derives the sender address from them once at admission.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Size in bytes
    pub const LEN: usize = 32;

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        PublicKey(bytes)
    }

    /// Create from a byte slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, PublicKeyError> {
        if slice.len() != Self::LEN {
            return Err(PublicKeyError::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(PublicKey(bytes))
    }

    /// Parse from a hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, PublicKeyError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| PublicKeyError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        PublicKey(bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_roundtrip() {
        let hex = format!("0x{}", "ab".repeat(32));
        let pk = PublicKey::from_hex(&hex).unwrap();
        assert_eq!(pk.to_hex(), hex);
    }

    #[test]
    fn test_from_slice_wrong_length() {
        assert!(matches!(
            PublicKey::from_slice(&[0u8; 33]),
            Err(PublicKeyError::InvalidLength(33))
        ));
    }
}
