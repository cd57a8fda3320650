//! A single personnel record: a unique name and the digest of its PIN.

use crate::core::hasher::{hash_pin, PinDigest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonnelRecord {
    pub name: String,
    #[serde(with = "digest_hex")]
    pub pin_hash: PinDigest,
}

impl PersonnelRecord {
    /// Build a record from a plaintext PIN. Only the digest is kept.
    pub fn new(name: impl Into<String>, pin: &str) -> Self {
        Self {
            name: name.into(),
            pin_hash: hash_pin(pin),
        }
    }

    /// Whether `pin` is this record's PIN.
    pub fn matches(&self, pin: &str) -> bool {
        self.pin_hash.matches_pin(pin)
    }

    /// Line written to the listing file, without the trailing newline.
    pub fn listing_line(&self) -> String {
        format!(
            "{}{}{}",
            self.name,
            crate::constants::LISTING_SEPARATOR,
            self.pin_hash
        )
    }
}

mod digest_hex {
    use crate::core::hasher::PinDigest;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(digest: &PinDigest, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&digest.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<PinDigest, D::Error> {
        let raw = String::deserialize(d)?;
        PinDigest::from_hex(&raw).map_err(de::Error::custom)
    }
}
