//! # Input Limits
//!
//! Upper bounds on proof and public-input sizes, checked before a request
//! reaches any backend. Defaults track the largest proofs each system
//! produces in practice: Groth16 around 256 bytes, PLONK under 1 KiB, STARK
//! tens of KiB.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uzkv_core::ProofType;

/// A request exceeded a configured size bound.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Proof larger than allowed for its type.
    #[error("{proof_type} proof is {len} bytes, limit is {max}")]
    ProofTooLarge {
        /// Proof system.
        proof_type: ProofType,
        /// Actual size.
        len: usize,
        /// Configured bound.
        max: usize,
    },

    /// Public inputs larger than allowed.
    #[error("public inputs are {len} bytes, limit is {max}")]
    PublicInputsTooLarge {
        /// Actual size.
        len: usize,
        /// Configured bound.
        max: usize,
    },
}

/// Per-proof-type size bounds, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    /// Maximum Groth16 proof size.
    pub groth16_max_proof: usize,
    /// Maximum PLONK proof size.
    pub plonk_max_proof: usize,
    /// Maximum STARK proof size.
    pub stark_max_proof: usize,
    /// Maximum public-input size for every proof type.
    pub max_public_inputs: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            groth16_max_proof: 512,
            plonk_max_proof: 4_096,
            stark_max_proof: 1_000_000,
            max_public_inputs: 65_536,
        }
    }
}

impl InputLimits {
    /// Bounds that accept anything addressable.
    pub fn unbounded() -> Self {
        Self {
            groth16_max_proof: usize::MAX,
            plonk_max_proof: usize::MAX,
            stark_max_proof: usize::MAX,
            max_public_inputs: usize::MAX,
        }
    }

    /// Maximum proof size for `proof_type`.
    pub fn max_proof(&self, proof_type: ProofType) -> usize {
        match proof_type {
            ProofType::Groth16 => self.groth16_max_proof,
            ProofType::Plonk => self.plonk_max_proof,
            ProofType::Stark => self.stark_max_proof,
        }
    }

    /// Check one request.
    pub fn check(
        &self,
        proof_type: ProofType,
        proof_len: usize,
        public_inputs_len: usize,
    ) -> Result<(), LimitError> {
        let max = self.max_proof(proof_type);
        if proof_len > max {
            return Err(LimitError::ProofTooLarge {
                proof_type,
                len: proof_len,
                max,
            });
        }
        if public_inputs_len > self.max_public_inputs {
            return Err(LimitError::PublicInputsTooLarge {
                len: public_inputs_len,
                max: self.max_public_inputs,
            });
        }
        Ok(())
    }
}
