//! Byte-exact wire vectors. These pin the big-endian layout so that any
//! producer in any runtime can be checked against the same hex.

use uzkv_core::{
    CodecError, DecodeMode, Nullifier, ProofEnvelope, ProofType, PublicStatement, VkHash,
};

// -------------------------------------------------------------------------
// ProofEnvelope
// -------------------------------------------------------------------------

const PLONK_ENVELOPE_HEX: &str = concat!(
    "01",                                                               // version
    "01",                                                               // plonk
    "00000102",                                                         // program 258
    "0101010101010101010101010101010101010101010101010101010101010101", // vk_hash
    "00000004",                                                         // proof_len
    "deadbeef",                                                         // proof
    "00000002",                                                         // public_len
    "cafe",                                                             // public inputs
);

#[test]
fn plonk_envelope_vector_encodes() {
    let env = ProofEnvelope::new(
        ProofType::Plonk,
        258,
        VkHash::from_bytes([0x01; 32]),
        vec![0xde_u8, 0xad, 0xbe, 0xef],
        vec![0xca_u8, 0xfe],
    )
    .unwrap();
    assert_eq!(hex::encode(env.encode()), PLONK_ENVELOPE_HEX);
}

#[test]
fn plonk_envelope_vector_decodes() {
    let bytes = hex::decode(PLONK_ENVELOPE_HEX).unwrap();
    let env = ProofEnvelope::decode(&bytes).unwrap();
    assert_eq!(env.proof_type(), ProofType::Plonk);
    assert_eq!(env.program_id(), 258);
    assert_eq!(env.vk_hash(), VkHash::from_bytes([0x01; 32]));
    assert_eq!(env.proof(), &[0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(env.public_inputs(), &[0xca, 0xfe]);
}

#[test]
fn minimal_stark_envelope_is_46_bytes() {
    let env = ProofEnvelope::new(ProofType::Stark, 0, VkHash::ZERO, Vec::<u8>::new(), Vec::<u8>::new()).unwrap();
    let bytes = env.encode();
    assert_eq!(bytes.len(), 46);
    assert_eq!(&bytes[..2], &[0x01, 0x02]);
    assert!(bytes[2..].iter().all(|b| *b == 0));
}

#[test]
fn truncated_vector_reports_remaining() {
    let bytes = hex::decode(PLONK_ENVELOPE_HEX).unwrap();
    // Cut inside the proof bytes: header (42) + 2 of 4 proof bytes.
    let err = ProofEnvelope::decode(&bytes[..44]).unwrap_err();
    assert_eq!(
        err,
        CodecError::TruncatedBuffer {
            field: "proof",
            needed: 4,
            remaining: 2,
        }
    );
}

#[test]
fn lenient_decode_of_vector_with_padding() {
    let mut bytes = hex::decode(PLONK_ENVELOPE_HEX).unwrap();
    bytes.extend_from_slice(&[0u8; 8]);
    assert_eq!(
        ProofEnvelope::decode(&bytes).unwrap_err(),
        CodecError::TrailingBytes(8)
    );
    let env = ProofEnvelope::decode_with(&bytes, DecodeMode::Lenient).unwrap();
    assert_eq!(hex::encode(env.encode()), PLONK_ENVELOPE_HEX);
}

// -------------------------------------------------------------------------
// PublicStatement
// -------------------------------------------------------------------------

#[test]
fn statement_vector() {
    let stmt = PublicStatement::new(
        [0xaa; 32],
        [0xbb; 32],
        Nullifier::from_bytes([0xcc; 32]),
        0x0102,
        vec![0xff_u8],
    )
    .unwrap();
    let expected = format!(
        "{}{}{}{}{}{}",
        "aa".repeat(32),
        "bb".repeat(32),
        "cc".repeat(32),
        "00000000000000000000000000000102",
        "00000001",
        "ff",
    );
    assert_eq!(hex::encode(stmt.encode()), expected);
    let decoded = PublicStatement::decode(&hex::decode(&expected).unwrap()).unwrap();
    assert_eq!(decoded, stmt);
    assert_eq!(decoded.value(), 258);
}

#[test]
fn statement_max_value() {
    let stmt =
        PublicStatement::new([0; 32], [0; 32], Nullifier::ZERO, u128::MAX, Vec::<u8>::new()).unwrap();
    let bytes = stmt.encode();
    assert_eq!(&bytes[96..112], &[0xff; 16]);
    assert_eq!(PublicStatement::decode(&bytes).unwrap().value(), u128::MAX);
}
