//! # Verification Backend Trait
//!
//! The capability interface between the dispatcher and a verification
//! engine. Implementations may be in-process libraries, FFI bindings, or
//! clients of a remote prover network; the dispatcher sees only this trait.
//!
//! ## Error Contract
//!
//! - `Ok(true)`: the proof verifies.
//! - `Ok(false)`: the request was well-formed and the proof is invalid.
//! - `Err(BackendError::Malformed)`: the request could not be interpreted
//!   (bad key encoding, wrong proof length, ...). The caller should fix the
//!   request rather than regenerate the proof.
//! - `Err(BackendError::Execution)`: the engine failed while checking.
//! - `Err(BackendError::Unavailable)`: the engine could not be reached or
//!   timed out. Never equivalent to "invalid".
//!
//! Unlike a closed proof-system trait, `VerifyBackend` is open: real engines
//! live in other crates. Deployments restrict which kinds are acceptable
//! through [`ProofPolicy`](crate::ProofPolicy).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uzkv_core::{ProofType, VkHash};

/// Failure reported by a backend. Never a verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request is structurally malformed for this engine.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// The engine failed while executing the check.
    #[error("execution failed: {0}")]
    Execution(String),

    /// The engine is unreachable, disconnected, or timed out.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// What sort of engine a backend is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Deterministic SHA-256 stand-in. No cryptographic security.
    Mock,
    /// In-process cryptographic implementation.
    Native,
    /// Out-of-process engine reached over FFI or the network.
    External,
}

impl BackendKind {
    /// Whether this kind provides real cryptographic security.
    pub fn is_real(self) -> bool {
        !matches!(self, BackendKind::Mock)
    }

    /// Return the string value for serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Native => "native",
            Self::External => "external",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and kind of a backend, recorded in every audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackendIdentity {
    /// Stable, human-readable name, e.g. `"arkworks-groth16"`.
    pub name: String,
    /// Engine kind, checked against the deployment policy.
    pub kind: BackendKind,
}

impl BackendIdentity {
    /// Build an identity.
    pub fn new(name: impl Into<String>, kind: BackendKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl std::fmt::Display for BackendIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// One verification call as handed to a backend.
#[derive(Debug, Clone, Copy)]
pub struct VerifyRequest<'a> {
    /// Proof system of `proof`.
    pub proof_type: ProofType,
    /// Raw proof bytes.
    pub proof: &'a [u8],
    /// Raw public inputs.
    pub public_inputs: &'a [u8],
    /// Digest of the verification key. Zero for transparent systems.
    pub vk_hash: VkHash,
    /// Registered key bytes for `vk_hash`. `None` for transparent systems.
    pub verification_key: Option<&'a [u8]>,
}

/// A verification engine for one or more proof types.
///
/// Requires `Send + Sync` so a configured verifier can be shared across
/// threads behind an `Arc`.
pub trait VerifyBackend: Send + Sync {
    /// Name and kind of this backend.
    fn identity(&self) -> BackendIdentity;

    /// Whether this backend can check proofs of `proof_type`.
    fn supports(&self, _proof_type: ProofType) -> bool {
        true
    }

    /// Check one proof.
    ///
    /// # Errors
    ///
    /// See the module-level error contract. Returning `Ok(false)` for a
    /// request the engine could not interpret is a contract violation.
    fn verify(&self, request: &VerifyRequest<'_>) -> Result<bool, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rejecting;

    impl VerifyBackend for Rejecting {
        fn identity(&self) -> BackendIdentity {
            BackendIdentity::new("rejecting", BackendKind::Native)
        }

        fn verify(&self, _request: &VerifyRequest<'_>) -> Result<bool, BackendError> {
            Ok(false)
        }
    }

    #[test]
    fn default_supports_everything() {
        for t in ProofType::ALL {
            assert!(Rejecting.supports(t));
        }
    }

    #[test]
    fn trait_object_dispatch() {
        let backend: Box<dyn VerifyBackend> = Box::new(Rejecting);
        let req = VerifyRequest {
            proof_type: ProofType::Stark,
            proof: &[],
            public_inputs: &[],
            vk_hash: VkHash::ZERO,
            verification_key: None,
        };
        assert_eq!(backend.verify(&req), Ok(false));
        assert_eq!(backend.identity().name, "rejecting");
    }

    #[test]
    fn kind_realness() {
        assert!(!BackendKind::Mock.is_real());
        assert!(BackendKind::Native.is_real());
        assert!(BackendKind::External.is_real());
    }

    #[test]
    fn identity_display() {
        let id = BackendIdentity::new("stylus-engine", BackendKind::External);
        assert_eq!(format!("{id}"), "stylus-engine (external)");
    }

    #[test]
    fn error_display_keeps_reason() {
        let err = BackendError::Malformed("vk is 3 bytes".into());
        assert_eq!(format!("{err}"), "malformed input: vk is 3 bytes");
        let err = BackendError::Unavailable("timed out after 5s".into());
        assert!(format!("{err}").contains("timed out"));
    }
}
