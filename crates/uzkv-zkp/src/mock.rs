//! # Mock Backend
//!
//! A deterministic, transparent backend for development and testing.
//! A mock proof is
//!
//! ```text
//! SHA-256("uzkv-mock-v1" || proof_type_tag || vk_hash || public_inputs)
//! ```
//!
//! so it binds the proof type, the key, and the public inputs, but anyone can
//! compute it. It provides no zero-knowledge or soundness guarantees.

use sha2::{Digest, Sha256};
use uzkv_core::{ProofType, VkHash};

use crate::traits::{BackendError, BackendIdentity, BackendKind, VerifyBackend, VerifyRequest};

const DOMAIN_TAG: &[u8] = b"uzkv-mock-v1";

/// Length of a mock proof.
pub const MOCK_PROOF_LEN: usize = 32;

/// A deterministic SHA-256 backend.
#[derive(Debug, Clone)]
pub struct MockBackend {
    name: String,
    supported: Vec<ProofType>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// A mock that handles every proof type.
    pub fn new() -> Self {
        Self {
            name: "mock-sha256".to_string(),
            supported: ProofType::ALL.to_vec(),
        }
    }

    /// A mock restricted to `types`, named `name`. Useful for exercising
    /// fallback routing.
    pub fn for_types(name: impl Into<String>, types: &[ProofType]) -> Self {
        Self {
            name: name.into(),
            supported: types.to_vec(),
        }
    }

    /// Produce the mock proof for the given inputs.
    pub fn prove(proof_type: ProofType, vk_hash: &VkHash, public_inputs: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_TAG);
        hasher.update([proof_type.to_u8()]);
        hasher.update(vk_hash.as_bytes());
        hasher.update(public_inputs);
        hasher.finalize().to_vec()
    }
}

impl VerifyBackend for MockBackend {
    fn identity(&self) -> BackendIdentity {
        BackendIdentity::new(self.name.clone(), BackendKind::Mock)
    }

    fn supports(&self, proof_type: ProofType) -> bool {
        self.supported.contains(&proof_type)
    }

    fn verify(&self, request: &VerifyRequest<'_>) -> Result<bool, BackendError> {
        if request.proof.len() != MOCK_PROOF_LEN {
            return Err(BackendError::Malformed(format!(
                "mock proof must be {MOCK_PROOF_LEN} bytes, got {}",
                request.proof.len()
            )));
        }
        let expected = Self::prove(request.proof_type, &request.vk_hash, request.public_inputs);
        Ok(expected.as_slice() == request.proof)
    }
}
