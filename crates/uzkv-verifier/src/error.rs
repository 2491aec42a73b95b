//! # Dispatch Errors
//!
//! A mathematically invalid proof ([`RejectionReason::InvalidProof`]) is kept
//! apart from a request the backend could not interpret
//! ([`RejectionReason::MalformedInput`]) and from a backend that could not be
//! reached ([`DispatchError::BackendUnavailable`]). Callers regenerate the
//! proof in the first case, fix the request in the second, and retry later
//! in the third.

use thiserror::Error;
use uzkv_core::{CodecError, ProofType, VkHash};
use uzkv_ledger::{AccessError, CapabilityKind, ReplayError};
use uzkv_zkp::{LimitError, PolicyError, SecurityError};

/// Why a backend did not accept a proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The proof does not verify.
    InvalidProof,
    /// The backend could not interpret the request.
    MalformedInput(String),
    /// The backend failed while checking.
    ExecutionFailed(String),
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProof => f.write_str("invalid proof"),
            Self::MalformedInput(m) => write!(f, "malformed input: {m}"),
            Self::ExecutionFailed(m) => write!(f, "execution failed: {m}"),
        }
    }
}

/// Failure of a verification or backend-configuration call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The verifier is paused.
    #[error("verifier is paused")]
    Paused,

    /// A capability from another verifier was presented.
    #[error("unauthorized: {capability} capability does not belong to this verifier")]
    Unauthorized {
        /// The capability that was checked.
        capability: CapabilityKind,
    },

    /// No key with this hash is registered for the proof type.
    #[error("no {proof_type} verification key registered with hash {vk_hash}")]
    VkNotRegistered {
        /// Proof system namespace.
        proof_type: ProofType,
        /// Hash that was looked up.
        vk_hash: VkHash,
    },

    /// The proof system does not meet the configured security requirement.
    #[error(transparent)]
    InsufficientSecurity(#[from] SecurityError),

    /// No configured backend handles this proof type.
    #[error("no backend configured for {0} proofs")]
    UnsupportedProofType(ProofType),

    /// The backend could not be reached or timed out.
    #[error("backend {backend} unavailable: {reason}")]
    BackendUnavailable {
        /// Backend name.
        backend: String,
        /// Reason reported by the backend.
        reason: String,
    },

    /// The backend did not accept the proof.
    #[error("backend {backend} rejected proof: {reason}")]
    BackendRejected {
        /// Backend name.
        backend: String,
        /// Why.
        reason: RejectionReason,
    },

    /// Array lengths disagree or a size limit was exceeded.
    #[error("invalid input size: {0}")]
    InvalidInputSize(String),

    /// The proof verified but its nullifier was already consumed.
    #[error(transparent)]
    Replay(#[from] ReplayError),

    /// The backend kind is not allowed by the deployment policy.
    #[error(transparent)]
    PolicyRejected(#[from] PolicyError),
}

impl DispatchError {
    /// Whether the backend found the proof mathematically invalid.
    pub fn is_invalid_proof(&self) -> bool {
        matches!(
            self,
            Self::BackendRejected {
                reason: RejectionReason::InvalidProof,
                ..
            }
        )
    }
}

impl From<AccessError> for DispatchError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Paused => Self::Paused,
            AccessError::Unauthorized { capability } => Self::Unauthorized { capability },
        }
    }
}

impl From<LimitError> for DispatchError {
    fn from(err: LimitError) -> Self {
        Self::InvalidInputSize(err.to_string())
    }
}

/// Failure of [`UniversalVerifier::verify_envelope`](crate::UniversalVerifier::verify_envelope).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifierError {
    /// The envelope could not be decoded.
    #[error("envelope decode failed: {0}")]
    Codec(#[from] CodecError),

    /// Dispatch failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use uzkv_core::Nullifier;

    #[test]
    fn access_errors_map_variant_for_variant() {
        assert_eq!(DispatchError::from(AccessError::Paused), DispatchError::Paused);
        assert_eq!(
            DispatchError::from(AccessError::Unauthorized {
                capability: CapabilityKind::ModuleManager
            }),
            DispatchError::Unauthorized {
                capability: CapabilityKind::ModuleManager
            }
        );
    }

    #[test]
    fn limit_error_becomes_invalid_input_size() {
        let err = DispatchError::from(LimitError::PublicInputsTooLarge { len: 9, max: 8 });
        assert_eq!(
            err,
            DispatchError::InvalidInputSize("public inputs are 9 bytes, limit is 8".into())
        );
    }

    #[test]
    fn rejected_display_forwards_reason() {
        let err = DispatchError::BackendRejected {
            backend: "ark".into(),
            reason: RejectionReason::MalformedInput("bad G1 point".into()),
        };
        assert_eq!(
            format!("{err}"),
            "backend ark rejected proof: malformed input: bad G1 point"
        );
        assert!(!err.is_invalid_proof());
    }

    #[test]
    fn invalid_proof_predicate() {
        let err = DispatchError::BackendRejected {
            backend: "ark".into(),
            reason: RejectionReason::InvalidProof,
        };
        assert!(err.is_invalid_proof());
    }

    #[test]
    fn security_error_is_transparent() {
        let err: DispatchError = SecurityError::PostQuantumRequired {
            proof_type: ProofType::Plonk,
        }
        .into();
        assert_eq!(format!("{err}"), "plonk is not post-quantum secure");
        assert!(!err.is_invalid_proof());
    }

    #[test]
    fn replay_is_transparent() {
        let n = Nullifier::from_bytes([1; 32]);
        let err = DispatchError::from(ReplayError::NullifierReplay { nullifier: n });
        assert_eq!(
            format!("{err}"),
            format!("nullifier {} has already been used", n.to_hex())
        );
    }

    #[test]
    fn verifier_error_wraps_codec() {
        let err = VerifierError::from(CodecError::UnsupportedVersion(3));
        assert!(format!("{err}").contains("unsupported envelope version 3"));
    }
}
