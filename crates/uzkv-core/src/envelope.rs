//! # Proof Envelope Codec
//!
//! The versioned binary container a caller submits for verification.
//!
//! ```text
//! version        : 1 byte   (currently 1)
//! proof_type     : 1 byte   (0 = groth16, 1 = plonk, 2 = stark)
//! program_id     : 4 bytes, big-endian
//! vk_hash        : 32 bytes
//! proof_len      : 4 bytes, big-endian
//! proof          : proof_len bytes
//! public_len     : 4 bytes, big-endian
//! public_inputs  : public_len bytes
//! ```
//!
//! ## Security Invariant
//!
//! `encode(decode(b)) == b` for every buffer `encode` produced. Decoding
//! rejects truncated buffers, unknown versions, and unknown proof-type tags,
//! and in [`DecodeMode::Strict`] rejects trailing bytes.

use crate::codec::{check_prefixable, put_length_prefixed, ByteReader, DecodeMode};
use crate::digest::VkHash;
use crate::error::CodecError;
use crate::proof_type::ProofType;
use crate::statement::PublicStatement;

/// The only envelope format version this build reads and writes.
pub const ENVELOPE_VERSION: u8 = 1;

/// Size of an envelope with empty proof and public inputs.
pub const ENVELOPE_HEADER_LEN: usize = 1 + 1 + 4 + 32 + 4 + 4;

/// A decoded proof envelope.
///
/// Fields are private so that every value in existence has variable-length
/// fields that fit their `u32` prefixes, which makes [`encode`](Self::encode)
/// infallible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofEnvelope {
    proof_type: ProofType,
    program_id: u32,
    vk_hash: VkHash,
    proof: Vec<u8>,
    public_inputs: Vec<u8>,
}

impl ProofEnvelope {
    /// Build an envelope. For [`ProofType::Stark`] the `vk_hash` is carried
    /// but never consulted; pass [`VkHash::ZERO`].
    pub fn new(
        proof_type: ProofType,
        program_id: u32,
        vk_hash: VkHash,
        proof: impl Into<Vec<u8>>,
        public_inputs: impl Into<Vec<u8>>,
    ) -> Result<Self, CodecError> {
        let proof = proof.into();
        let public_inputs = public_inputs.into();
        check_prefixable("proof", &proof)?;
        check_prefixable("public_inputs", &public_inputs)?;
        Ok(Self {
            proof_type,
            program_id,
            vk_hash,
            proof,
            public_inputs,
        })
    }

    /// Format version. Always [`ENVELOPE_VERSION`].
    pub fn version(&self) -> u8 {
        ENVELOPE_VERSION
    }

    /// Proof system tag.
    pub fn proof_type(&self) -> ProofType {
        self.proof_type
    }

    /// Identifier of the constraint program the proof is for.
    pub fn program_id(&self) -> u32 {
        self.program_id
    }

    /// Digest of the verification key.
    pub fn vk_hash(&self) -> VkHash {
        self.vk_hash
    }

    /// Raw proof bytes.
    pub fn proof(&self) -> &[u8] {
        &self.proof
    }

    /// Raw public inputs. Either field-element encodings or an encoded
    /// [`PublicStatement`].
    pub fn public_inputs(&self) -> &[u8] {
        &self.public_inputs
    }

    /// Exact encoded size.
    pub fn encoded_len(&self) -> usize {
        ENVELOPE_HEADER_LEN + self.proof.len() + self.public_inputs.len()
    }

    /// Encode to the wire layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.push(ENVELOPE_VERSION);
        out.push(self.proof_type.to_u8());
        out.extend_from_slice(&self.program_id.to_be_bytes());
        out.extend_from_slice(self.vk_hash.as_bytes());
        put_length_prefixed(&mut out, &self.proof);
        put_length_prefixed(&mut out, &self.public_inputs);
        out
    }

    /// Strict decode: trailing bytes are rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::decode_with(bytes, DecodeMode::Strict)
    }

    /// Decode with an explicit trailing-bytes rule.
    pub fn decode_with(bytes: &[u8], mode: DecodeMode) -> Result<Self, CodecError> {
        let mut r = ByteReader::new(bytes);
        let version = r.u8("version")?;
        if version != ENVELOPE_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        let proof_type = ProofType::from_u8(r.u8("proof_type")?)?;
        let program_id = r.u32_be("program_id")?;
        let vk_hash = VkHash::from_bytes(r.array("vk_hash")?);
        let proof = r.length_prefixed("proof_len", "proof")?.to_vec();
        let public_inputs = r.length_prefixed("public_len", "public_inputs")?.to_vec();
        r.finish(mode)?;
        Ok(Self {
            proof_type,
            program_id,
            vk_hash,
            proof,
            public_inputs,
        })
    }

    /// Strictly decode the public inputs as a [`PublicStatement`].
    pub fn decode_public_statement(&self) -> Result<PublicStatement, CodecError> {
        PublicStatement::decode(&self.public_inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Nullifier;

    fn sample() -> ProofEnvelope {
        ProofEnvelope::new(
            ProofType::Groth16,
            42,
            VkHash::of(b"vk"),
            vec![1_u8, 2, 3],
            vec![4_u8, 5],
        )
        .unwrap()
    }

    #[test]
    fn encoded_layout() {
        let env = sample();
        let bytes = env.encode();
        assert_eq!(bytes.len(), ENVELOPE_HEADER_LEN + 5);
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[1], 0);
        assert_eq!(&bytes[2..6], &[0, 0, 0, 42]);
        assert_eq!(&bytes[6..38], VkHash::of(b"vk").as_bytes());
        assert_eq!(&bytes[38..42], &[0, 0, 0, 3]);
        assert_eq!(&bytes[42..45], &[1, 2, 3]);
        assert_eq!(&bytes[45..49], &[0, 0, 0, 2]);
        assert_eq!(&bytes[49..], &[4, 5]);
    }

    #[test]
    fn round_trip() {
        let env = sample();
        let decoded = ProofEnvelope::decode(&env.encode()).unwrap();
        assert_eq!(decoded, env);
        assert_eq!(decoded.version(), ENVELOPE_VERSION);
    }

    #[test]
    fn unknown_version_rejected() {
        let mut bytes = sample().encode();
        bytes[0] = 2;
        assert_eq!(
            ProofEnvelope::decode(&bytes),
            Err(CodecError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn unknown_proof_type_rejected() {
        let mut bytes = sample().encode();
        bytes[1] = 7;
        assert_eq!(
            ProofEnvelope::decode(&bytes),
            Err(CodecError::InvalidProofType(7))
        );
    }

    #[test]
    fn empty_buffer_is_truncated() {
        assert!(matches!(
            ProofEnvelope::decode(&[]),
            Err(CodecError::TruncatedBuffer { field: "version", .. })
        ));
    }

    #[test]
    fn trailing_bytes_strict_vs_lenient() {
        let env = sample();
        let mut bytes = env.encode();
        bytes.extend_from_slice(&[0xff, 0xff, 0xff]);
        assert_eq!(
            ProofEnvelope::decode(&bytes),
            Err(CodecError::TrailingBytes(3))
        );
        assert_eq!(
            ProofEnvelope::decode_with(&bytes, DecodeMode::Lenient).unwrap(),
            env
        );
    }

    #[test]
    fn oversized_proof_length_is_truncated_not_allocated() {
        let mut bytes = sample().encode();
        bytes[38..42].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            ProofEnvelope::decode(&bytes),
            Err(CodecError::TruncatedBuffer { field: "proof", .. })
        ));
    }

    #[test]
    fn public_statement_through_envelope() {
        let stmt = PublicStatement::new(
            [1; 32],
            [2; 32],
            Nullifier::from_bytes([3; 32]),
            99,
            Vec::<u8>::new(),
        )
        .unwrap();
        let env =
            ProofEnvelope::new(ProofType::Stark, 7, VkHash::ZERO, vec![0xaa_u8], stmt.encode()).unwrap();
        assert_eq!(env.decode_public_statement().unwrap(), stmt);
    }

    #[test]
    fn raw_public_inputs_are_not_a_statement() {
        assert!(sample().decode_public_statement().is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_envelope() -> impl Strategy<Value = ProofEnvelope> {
            (
                prop_oneof![
                    Just(ProofType::Groth16),
                    Just(ProofType::Plonk),
                    Just(ProofType::Stark)
                ],
                any::<u32>(),
                any::<[u8; 32]>(),
                proptest::collection::vec(any::<u8>(), 0..512),
                proptest::collection::vec(any::<u8>(), 0..256),
            )
                .prop_map(|(t, program, vk, proof, inputs)| {
                    ProofEnvelope::new(t, program, VkHash::from_bytes(vk), proof, inputs).unwrap()
                })
        }

        proptest! {
            #[test]
            fn decode_inverts_encode(env in arb_envelope()) {
                let bytes = env.encode();
                prop_assert_eq!(bytes.len(), env.encoded_len());
                let decoded = ProofEnvelope::decode(&bytes).unwrap();
                prop_assert_eq!(decoded.encode(), bytes);
                prop_assert_eq!(decoded, env);
            }

            #[test]
            fn every_strict_prefix_is_truncated(env in arb_envelope(), cut in any::<prop::sample::Index>()) {
                let bytes = env.encode();
                let len = cut.index(bytes.len());
                let err = ProofEnvelope::decode(&bytes[..len]).unwrap_err();
                let is_truncated = matches!(err, CodecError::TruncatedBuffer { .. });
                prop_assert!(is_truncated);
            }

            #[test]
            fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..1024)) {
                let _ = ProofEnvelope::decode(&bytes);
                let _ = ProofEnvelope::decode_with(&bytes, DecodeMode::Lenient);
            }
        }
    }
}
