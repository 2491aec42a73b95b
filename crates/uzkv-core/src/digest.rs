//! # 32-Byte Identifiers
//!
//! [`VkHash`] identifies a verification key; [`Nullifier`] is a one-time
//! authorization token carried in a [`PublicStatement`](crate::PublicStatement).
//! Both are opaque 32-byte values with a lowercase hex text form.
//!
//! ## Security Invariant
//!
//! A `VkHash` built by [`VkHash::of`] is always `SHA-256(key_bytes)`. The raw
//! key is transmitted once at registration; every later call references it
//! by this digest.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::IdentifierError;

macro_rules! bytes32_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; 32]);

        impl $name {
            /// The all-zero value.
            pub const ZERO: Self = Self([0u8; 32]);

            /// Wrap raw bytes.
            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Borrow the raw bytes.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Whether every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            /// Lowercase hex, no prefix.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parse 64 hex characters, with or without a `0x` prefix.
            pub fn from_hex(s: &str) -> Result<Self, IdentifierError> {
                let s = s.trim();
                let s = s.strip_prefix("0x").unwrap_or(s);
                let raw = hex::decode(s)?;
                let bytes: [u8; 32] = raw
                    .as_slice()
                    .try_into()
                    .map_err(|_| IdentifierError::WrongLength(raw.len()))?;
                Ok(Self(bytes))
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

bytes32_newtype!(
    /// SHA-256 digest of a verification key's raw bytes.
    VkHash
);

bytes32_newtype!(
    /// A one-time-use authorization token. The zero value means "none".
    Nullifier
);

impl VkHash {
    /// Hash raw verification-key bytes.
    pub fn of(vk_bytes: &[u8]) -> Self {
        Self(Sha256::digest(vk_bytes).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vk_hash_is_sha256() {
        // SHA-256 of the empty string.
        assert_eq!(
            VkHash::of(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn vk_hash_is_deterministic() {
        assert_eq!(VkHash::of(b"key material"), VkHash::of(b"key material"));
        assert_ne!(VkHash::of(b"key material"), VkHash::of(b"key materiaL"));
    }

    #[test]
    fn hex_round_trip_with_prefix() {
        let h = VkHash::of(b"abc");
        assert_eq!(VkHash::from_hex(&h.to_hex()).unwrap(), h);
        assert_eq!(VkHash::from_hex(&format!("0x{}", h.to_hex())).unwrap(), h);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert_eq!(
            Nullifier::from_hex("abcd"),
            Err(IdentifierError::WrongLength(2))
        );
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let err = Nullifier::from_hex(&"zz".repeat(32)).unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidHex(_)));
    }

    #[test]
    fn zero_detection() {
        assert!(Nullifier::ZERO.is_zero());
        assert!(Nullifier::default().is_zero());
        let mut raw = [0u8; 32];
        raw[31] = 1;
        assert!(!Nullifier::from_bytes(raw).is_zero());
    }

    #[test]
    fn debug_and_display() {
        let n = Nullifier::from_bytes([0xab; 32]);
        assert_eq!(format!("{n}"), "ab".repeat(32));
        assert!(format!("{n:?}").starts_with("Nullifier("));
    }

    #[test]
    fn serde_as_hex_string() {
        let h = VkHash::of(b"vk");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h.to_hex()));
        let back: VkHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
        assert!(serde_json::from_str::<VkHash>("\"00\"").is_err());
    }
}
