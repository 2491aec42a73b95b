//! # Public Statement Codec
//!
//! The standardized public-output record a proof may expose through its
//! public inputs. Fixed 116-byte prefix followed by one length-prefixed
//! trailer:
//!
//! ```text
//! merkle_root : 32 bytes
//! public_key  : 32 bytes
//! nullifier   : 32 bytes
//! value       : 16 bytes, big-endian u128
//! extra_len   : 4 bytes, big-endian u32
//! extra       : extra_len bytes
//! ```

use crate::codec::{check_prefixable, put_length_prefixed, ByteReader, DecodeMode};
use crate::digest::Nullifier;
use crate::error::CodecError;

/// Size of the fixed part of an encoded statement, including the `extra`
/// length prefix.
pub const STATEMENT_FIXED_LEN: usize = 32 + 32 + 32 + 16 + 4;

/// A decoded public statement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublicStatement {
    merkle_root: [u8; 32],
    public_key: [u8; 32],
    nullifier: Nullifier,
    value: u128,
    extra: Vec<u8>,
}

impl PublicStatement {
    /// Build a statement. Fails only if `extra` does not fit a `u32` length.
    pub fn new(
        merkle_root: [u8; 32],
        public_key: [u8; 32],
        nullifier: Nullifier,
        value: u128,
        extra: impl Into<Vec<u8>>,
    ) -> Result<Self, CodecError> {
        let extra = extra.into();
        check_prefixable("extra", &extra)?;
        Ok(Self {
            merkle_root,
            public_key,
            nullifier,
            value,
            extra,
        })
    }

    /// State root the statement commits to. Zero when not applicable.
    pub fn merkle_root(&self) -> &[u8; 32] {
        &self.merkle_root
    }

    /// Public key of the acting party.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// One-time authorization token.
    pub fn nullifier(&self) -> Nullifier {
        self.nullifier
    }

    /// Application value.
    pub fn value(&self) -> u128 {
        self.value
    }

    /// Application-defined trailer.
    pub fn extra(&self) -> &[u8] {
        &self.extra
    }

    /// Whether the statement carries a nullifier that dispatch must consume.
    pub fn has_nullifier(&self) -> bool {
        !self.nullifier.is_zero()
    }

    /// Exact encoded size: `116 + extra.len()`.
    pub fn encoded_len(&self) -> usize {
        STATEMENT_FIXED_LEN + self.extra.len()
    }

    /// Encode to the wire layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.merkle_root);
        out.extend_from_slice(&self.public_key);
        out.extend_from_slice(self.nullifier.as_bytes());
        out.extend_from_slice(&self.value.to_be_bytes());
        put_length_prefixed(&mut out, &self.extra);
        out
    }

    /// Strict decode: trailing bytes are rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::decode_with(bytes, DecodeMode::Strict)
    }

    /// Decode with an explicit trailing-bytes rule.
    pub fn decode_with(bytes: &[u8], mode: DecodeMode) -> Result<Self, CodecError> {
        let mut r = ByteReader::new(bytes);
        let merkle_root = r.array("merkle_root")?;
        let public_key = r.array("public_key")?;
        let nullifier = Nullifier::from_bytes(r.array("nullifier")?);
        let value = r.u128_be("value")?;
        let extra = r.length_prefixed("extra_len", "extra")?.to_vec();
        r.finish(mode)?;
        Ok(Self {
            merkle_root,
            public_key,
            nullifier,
            value,
            extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PublicStatement {
        PublicStatement::new(
            [0x11; 32],
            [0x22; 32],
            Nullifier::from_bytes([0x33; 32]),
            1_000_000_000_000_000_000u128,
            vec![0xde_u8, 0xad],
        )
        .unwrap()
    }

    #[test]
    fn encoded_size_is_fixed_plus_extra() {
        let s = sample();
        assert_eq!(s.encode().len(), 118);
        assert_eq!(s.encoded_len(), 118);
        assert_eq!(PublicStatement::default().encode().len(), STATEMENT_FIXED_LEN);
    }

    #[test]
    fn round_trip() {
        let s = sample();
        assert_eq!(PublicStatement::decode(&s.encode()).unwrap(), s);
    }

    #[test]
    fn value_is_big_endian() {
        let s = PublicStatement::new([0; 32], [0; 32], Nullifier::ZERO, 1, Vec::<u8>::new()).unwrap();
        let bytes = s.encode();
        assert_eq!(&bytes[96..112], &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn zero_nullifier_is_absent() {
        assert!(!PublicStatement::default().has_nullifier());
        assert!(sample().has_nullifier());
    }

    #[test]
    fn every_short_prefix_is_truncated() {
        let bytes = sample().encode();
        for len in 0..bytes.len() {
            let err = PublicStatement::decode(&bytes[..len]).unwrap_err();
            assert!(
                matches!(err, CodecError::TruncatedBuffer { .. }),
                "prefix of {len} bytes gave {err:?}"
            );
        }
    }

    #[test]
    fn trailing_bytes_strict_vs_lenient() {
        let s = sample();
        let mut bytes = s.encode();
        bytes.push(0);
        assert_eq!(
            PublicStatement::decode(&bytes),
            Err(CodecError::TrailingBytes(1))
        );
        assert_eq!(
            PublicStatement::decode_with(&bytes, DecodeMode::Lenient).unwrap(),
            s
        );
    }

    #[test]
    fn declared_extra_longer_than_buffer() {
        let mut bytes = PublicStatement::default().encode();
        bytes[112..116].copy_from_slice(&100u32.to_be_bytes());
        assert!(matches!(
            PublicStatement::decode(&bytes),
            Err(CodecError::TruncatedBuffer { field: "extra", needed: 100, remaining: 0 })
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_statement() -> impl Strategy<Value = PublicStatement> {
            (
                any::<[u8; 32]>(),
                any::<[u8; 32]>(),
                any::<[u8; 32]>(),
                any::<u128>(),
                proptest::collection::vec(any::<u8>(), 0..256),
            )
                .prop_map(|(root, pk, n, value, extra)| {
                    PublicStatement::new(root, pk, Nullifier::from_bytes(n), value, extra).unwrap()
                })
        }

        proptest! {
            #[test]
            fn decode_inverts_encode(s in arb_statement()) {
                let bytes = s.encode();
                prop_assert_eq!(bytes.len(), STATEMENT_FIXED_LEN + s.extra().len());
                let decoded = PublicStatement::decode(&bytes).unwrap();
                prop_assert_eq!(decoded.encode(), bytes);
                prop_assert_eq!(decoded, s);
            }

            #[test]
            fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
                let _ = PublicStatement::decode(&bytes);
                let _ = PublicStatement::decode_with(&bytes, DecodeMode::Lenient);
            }
        }
    }
}
