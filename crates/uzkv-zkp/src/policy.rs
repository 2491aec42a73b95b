//! # Backend and Security Policy
//!
//! Decides which [`BackendKind`]s a deployment may route proofs to, and
//! which proof systems are strong enough to be dispatched at all.
//!
//! ## Problem
//!
//! [`MockBackend`](crate::MockBackend) accepts SHA-256 digests that anyone
//! can compute. A verifier configured with it in production accepts proofs
//! from callers who hold no witness.
//!
//! ## Configuration
//!
//! The policy mode is determined by:
//! 1. Explicit [`ProofPolicy::new`] construction
//! 2. Runtime environment variable (`UZKV_PROOF_POLICY`)
//! 3. Build profile: release builds default to `Production`, debug builds
//!    to `Development`
//!
//! ## Security Level
//!
//! [`SecurityRequirement`] is checked against the
//! [`SecurityModel`](uzkv_core::SecurityModel) of each proof type before a
//! request reaches the registry or any backend. The default (128 bits, no
//! post-quantum requirement) admits every supported system;
//! [`SecurityRequirement::post_quantum`] admits only STARK.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use uzkv_core::ProofType;

use crate::traits::{BackendIdentity, BackendKind};

/// Environment variable read by [`ProofPolicy::from_environment`].
pub const POLICY_ENV_VAR: &str = "UZKV_PROOF_POLICY";

/// Errors from policy enforcement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A mock backend was offered in production mode.
    #[error("mock backend rejected: production mode requires a real verification backend ({backend})")]
    MockBackendRejected {
        /// Name of the rejected backend.
        backend: String,
    },
}

/// A proof type does not meet the deployment's security requirement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// The proof system's security level is below the configured minimum.
    #[error("{proof_type} provides {provided_bits}-bit security, {required_bits} bits required")]
    InsufficientSecurityLevel {
        /// Proof system.
        proof_type: ProofType,
        /// Configured minimum.
        required_bits: u16,
        /// Level the proof system declares.
        provided_bits: u16,
    },

    /// Post-quantum security is required and the proof system lacks it.
    #[error("{proof_type} is not post-quantum secure")]
    PostQuantumRequired {
        /// Proof system.
        proof_type: ProofType,
    },
}

/// Minimum security properties a proof type must declare to be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityRequirement {
    /// Minimum conjectured security level, in bits.
    pub min_security_bits: u16,
    /// Admit only proof systems sound against a quantum adversary.
    pub require_post_quantum: bool,
}

impl Default for SecurityRequirement {
    fn default() -> Self {
        Self {
            min_security_bits: 128,
            require_post_quantum: false,
        }
    }
}

impl SecurityRequirement {
    /// 128 bits and post-quantum.
    pub fn post_quantum() -> Self {
        Self {
            require_post_quantum: true,
            ..Self::default()
        }
    }

    /// Whether `proof_type` meets the requirement.
    pub fn check(&self, proof_type: ProofType) -> Result<(), SecurityError> {
        let model = proof_type.security_model();
        if model.security_bits < self.min_security_bits {
            return Err(SecurityError::InsufficientSecurityLevel {
                proof_type,
                required_bits: self.min_security_bits,
                provided_bits: model.security_bits,
            });
        }
        if self.require_post_quantum && !model.post_quantum_secure() {
            return Err(SecurityError::PostQuantumRequired { proof_type });
        }
        Ok(())
    }
}

/// Policy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Reject mock backends unconditionally.
    Production,
    /// Accept mock backends (tests and local development only).
    Development,
}

impl PolicyMode {
    /// Parse `production`/`prod` or `development`/`dev`, any casing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }

    /// Compile-time default: release = production, debug = development.
    pub fn build_default() -> Self {
        if cfg!(not(debug_assertions)) {
            Self::Production
        } else {
            Self::Development
        }
    }
}

impl Default for PolicyMode {
    fn default() -> Self {
        Self::build_default()
    }
}

/// Runtime policy checked whenever a backend is configured.
///
/// ```rust
/// use uzkv_zkp::{BackendIdentity, BackendKind, ProofPolicy};
///
/// let policy = ProofPolicy::production();
/// assert!(policy.validate(&BackendIdentity::new("ark", BackendKind::Native)).is_ok());
/// assert!(policy.validate(&BackendIdentity::new("mock", BackendKind::Mock)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofPolicy {
    mode: PolicyMode,
    security: SecurityRequirement,
}

impl ProofPolicy {
    /// Create a policy with the given mode and the default security
    /// requirement.
    pub fn new(mode: PolicyMode) -> Self {
        Self {
            mode,
            security: SecurityRequirement::default(),
        }
    }

    /// Replace the security requirement.
    pub fn with_security(mut self, security: SecurityRequirement) -> Self {
        self.security = security;
        self
    }

    /// Production policy (rejects mock backends).
    pub fn production() -> Self {
        Self::new(PolicyMode::Production)
    }

    /// Development policy (accepts mock backends).
    pub fn development() -> Self {
        Self::new(PolicyMode::Development)
    }

    /// Policy from `UZKV_PROOF_POLICY`, falling back to the build default
    /// when the variable is unset or unrecognized.
    pub fn from_environment() -> Self {
        let mode = std::env::var(POLICY_ENV_VAR)
            .ok()
            .and_then(|v| PolicyMode::parse(&v))
            .unwrap_or_else(PolicyMode::build_default);
        Self::new(mode)
    }

    /// Whether `backend` may be configured under this policy.
    pub fn validate(&self, backend: &BackendIdentity) -> Result<(), PolicyError> {
        match (self.mode, backend.kind) {
            (PolicyMode::Production, BackendKind::Mock) => Err(PolicyError::MockBackendRejected {
                backend: backend.name.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Whether proofs of `proof_type` may be dispatched under this policy.
    pub fn check_security(&self, proof_type: ProofType) -> Result<(), SecurityError> {
        self.security.check(proof_type)
    }

    /// Current policy mode.
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    /// Current security requirement.
    pub fn security(&self) -> SecurityRequirement {
        self.security
    }
}

impl Default for ProofPolicy {
    fn default() -> Self {
        Self::new(PolicyMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock() -> BackendIdentity {
        BackendIdentity::new("mock-sha256", BackendKind::Mock)
    }

    #[test]
    fn production_rejects_mock() {
        let err = ProofPolicy::production().validate(&mock()).unwrap_err();
        assert_eq!(
            err,
            PolicyError::MockBackendRejected {
                backend: "mock-sha256".into()
            }
        );
    }

    #[test]
    fn production_accepts_real_kinds() {
        let policy = ProofPolicy::production();
        assert!(policy
            .validate(&BackendIdentity::new("ark", BackendKind::Native))
            .is_ok());
        assert!(policy
            .validate(&BackendIdentity::new("stylus", BackendKind::External))
            .is_ok());
    }

    #[test]
    fn development_accepts_mock() {
        assert!(ProofPolicy::development().validate(&mock()).is_ok());
    }

    #[test]
    fn default_security_admits_every_type() {
        let policy = ProofPolicy::production();
        for t in ProofType::ALL {
            assert!(policy.check_security(t).is_ok());
        }
    }

    #[test]
    fn post_quantum_only_admits_stark() {
        let policy = ProofPolicy::production().with_security(SecurityRequirement::post_quantum());
        assert_eq!(
            policy.check_security(ProofType::Groth16),
            Err(SecurityError::PostQuantumRequired {
                proof_type: ProofType::Groth16
            })
        );
        assert!(policy.check_security(ProofType::Plonk).is_err());
        assert!(policy.check_security(ProofType::Stark).is_ok());
    }

    #[test]
    fn minimum_bits_enforced() {
        let strict = SecurityRequirement {
            min_security_bits: 192,
            require_post_quantum: false,
        };
        let err = strict.check(ProofType::Stark).unwrap_err();
        assert_eq!(
            err,
            SecurityError::InsufficientSecurityLevel {
                proof_type: ProofType::Stark,
                required_bits: 192,
                provided_bits: 128
            }
        );
        assert_eq!(
            format!("{err}"),
            "stark provides 128-bit security, 192 bits required"
        );
    }

    #[test]
    fn security_requirement_missing_fields_default() {
        let req: SecurityRequirement = serde_json::from_str(r#"{"require_post_quantum":true}"#).unwrap();
        assert_eq!(req, SecurityRequirement::post_quantum());
    }

    #[test]
    fn parse_modes() {
        assert_eq!(PolicyMode::parse("PROD"), Some(PolicyMode::Production));
        assert_eq!(PolicyMode::parse(" dev "), Some(PolicyMode::Development));
        assert_eq!(PolicyMode::parse("staging"), None);
    }

    #[test]
    fn error_message_includes_backend() {
        let msg = format!("{}", ProofPolicy::production().validate(&mock()).unwrap_err());
        assert!(msg.contains("mock-sha256"));
        assert!(msg.contains("production mode"));
    }

    #[test]
    fn release_build_defaults_to_production() {
        if cfg!(not(debug_assertions)) {
            assert_eq!(PolicyMode::build_default(), PolicyMode::Production);
        } else {
            assert_eq!(PolicyMode::build_default(), PolicyMode::Development);
        }
    }

    #[test]
    fn mode_serialization() {
        let json = serde_json::to_string(&PolicyMode::Production).unwrap();
        assert_eq!(json, "\"production\"");
        let back: PolicyMode = serde_json::from_str("\"development\"").unwrap();
        assert_eq!(back, PolicyMode::Development);
    }
}
