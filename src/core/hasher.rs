//! One-way PIN digests.
//!
//! A PIN is reduced to the SHA-256 of its UTF-8 bytes. The digest is
//! unsalted so that the same PIN always yields the same digest, which the
//! PIN-reuse check relies on. Plaintexts are never compared directly.

use crate::constants;
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

/// Fixed-length digest of a plaintext PIN.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PinDigest([u8; 32]);

/// Hash a plaintext PIN into its canonical digest.
pub fn hash_pin(pin: &str) -> PinDigest {
    PinDigest(Sha256::digest(pin.as_bytes()).into())
}

impl PinDigest {
    /// Whether `pin` hashes to this digest. Compares in constant time.
    pub fn matches_pin(&self, pin: &str) -> bool {
        self.matches_digest(&hash_pin(pin))
    }

    pub fn matches_digest(&self, other: &PinDigest) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a rendered digest (64 hex characters).
    pub fn from_hex(s: &str) -> Result<Self, String> {
        if s.len() != constants::DIGEST_HEX_LEN {
            return Err(format!(
                "digest must be {} hex characters, got {}",
                constants::DIGEST_HEX_LEN,
                s.len()
            ));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| format!("invalid digest: {}", e))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Keep digests out of debug output.
impl fmt::Debug for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinDigest(..)")
    }
}
