//! # Concurrency and Codec Properties
//!
//! A shared verifier under contention consumes each nullifier exactly once.
//! Envelope bytes of any shape are handled without panics on the way
//! through the verifier.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use uzkv_core::{CodecError, Nullifier, ProofEnvelope, ProofType, PublicStatement, VkHash};
use uzkv_ledger::ReplayError;
use uzkv_verifier::{DispatchError, UniversalVerifier, VerifierConfig, VerifierError};
use uzkv_zkp::{MockBackend, PolicyMode};

fn shared_verifier() -> (Arc<UniversalVerifier>, VkHash) {
    let config = VerifierConfig {
        policy: PolicyMode::Development,
        ..VerifierConfig::default()
    };
    let (verifier, caps) = UniversalVerifier::new(config);
    verifier
        .set_primary_backend(&caps.module_manager, Arc::new(MockBackend::new()))
        .unwrap();
    let vk = verifier
        .register_verification_key(&caps.module_manager, ProofType::Groth16, b"K")
        .unwrap();
    (Arc::new(verifier), vk)
}

fn statement(n: [u8; 32]) -> Vec<u8> {
    PublicStatement::new([0; 32], [0; 32], Nullifier::from_bytes(n), 0, Vec::<u8>::new())
        .unwrap()
        .encode()
}

// ---------------------------------------------------------------------------
// Contention
// ---------------------------------------------------------------------------

#[test]
fn racing_submissions_consume_nullifier_once() {
    let (verifier, vk) = shared_verifier();
    let inputs = statement([0x77; 32]);
    let proof = MockBackend::prove(ProofType::Groth16, &vk, &inputs);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let verifier = Arc::clone(&verifier);
            let inputs = inputs.clone();
            let proof = proof.clone();
            thread::spawn(move || verifier.verify(ProofType::Groth16, &proof, &inputs, vk))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let accepted = results.iter().filter(|r| **r == Ok(true)).count();
    assert_eq!(accepted, 1);
    for r in results.iter().filter(|r| **r != Ok(true)) {
        assert_eq!(
            r,
            &Err(DispatchError::Replay(ReplayError::NullifierReplay {
                nullifier: Nullifier::from_bytes([0x77; 32])
            }))
        );
    }
    assert_eq!(verifier.stats().verification_count, 1);
}

#[test]
fn distinct_nullifiers_all_accepted_across_threads() {
    let (verifier, vk) = shared_verifier();
    let handles: Vec<_> = (0u8..16)
        .map(|i| {
            let verifier = Arc::clone(&verifier);
            thread::spawn(move || {
                let inputs = statement([i + 1; 32]);
                let proof = MockBackend::prove(ProofType::Groth16, &vk, &inputs);
                verifier.verify(ProofType::Groth16, &proof, &inputs, vk)
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), Ok(true));
    }
    let stats = verifier.stats();
    assert_eq!(stats.verification_count, 16);
    assert_eq!(stats.nullifier_count, 16);
}

// ---------------------------------------------------------------------------
// Codec properties through the verifier
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn truncated_envelopes_never_reach_dispatch(
        proof in proptest::collection::vec(any::<u8>(), 0..64),
        inputs in proptest::collection::vec(any::<u8>(), 0..64),
        program_id in any::<u32>(),
        cut in any::<prop::sample::Index>(),
    ) {
        let (verifier, vk) = shared_verifier();
        let bytes = ProofEnvelope::new(ProofType::Groth16, program_id, vk, proof, inputs)
            .unwrap()
            .encode();
        let prefix = &bytes[..cut.index(bytes.len())];
        let result = verifier.verify_envelope(prefix);
        let is_truncated = matches!(
            result,
            Err(VerifierError::Codec(CodecError::TruncatedBuffer { .. }))
        );
        prop_assert!(is_truncated);
        prop_assert_eq!(verifier.stats().verification_count, 0);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let (verifier, _vk) = shared_verifier();
        let _ = verifier.verify_envelope(&bytes);
    }
}
