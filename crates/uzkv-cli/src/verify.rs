//! # Verify Subcommand
//!
//! Verifies an envelope file against a throwaway in-process verifier whose
//! only backend is the SHA-256 mock. The verifier runs under the development
//! policy regardless of configuration, since the mock is all it has.
//!
//! The report carries the SHA-256 digest of every audit entry the run
//! produced, so an operator can match it against a deployment's trail.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use uzkv_core::{ProofEnvelope, ProofType};
use uzkv_verifier::{UniversalVerifier, VerifierConfig, VerifierError};
use uzkv_zkp::{MockBackend, PolicyMode};

/// Arguments for `uzkv verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Encoded envelope file.
    #[arg(value_name = "ENVELOPE_FILE")]
    pub envelope: PathBuf,
    /// Verification key to register before verifying.
    #[arg(long)]
    pub vk: Option<PathBuf>,
}

/// Outcome printed by `uzkv verify`.
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    /// Whether the proof was accepted.
    pub valid: bool,
    /// Proof system, when the envelope decoded.
    pub proof_type: Option<ProofType>,
    /// Backend that handled the proof.
    pub backend: Option<String>,
    /// Failure description.
    pub error: Option<String>,
    /// Hex SHA-256 digests of the audit entries recorded during the run.
    pub audit_digests: Vec<String>,
    #[serde(skip)]
    exit_code: u8,
}

impl VerifyReport {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    fn failed(proof_type: Option<ProofType>, exit_code: u8, error: String) -> Self {
        Self {
            valid: false,
            proof_type,
            backend: None,
            error: Some(error),
            audit_digests: Vec::new(),
            exit_code,
        }
    }
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = crate::load_config(config_path)?;
    let report = verify_file(&args.envelope, args.vk.as_deref(), config)?;
    crate::print_json(&report)?;
    Ok(report.exit_code())
}

/// Verify one envelope file. I/O problems are `Err`; everything about the
/// envelope itself is described in the report.
pub fn verify_file(
    envelope: &Path,
    vk: Option<&Path>,
    config: VerifierConfig,
) -> Result<VerifyReport> {
    let bytes = crate::read_input(envelope)?;
    let decoded = match ProofEnvelope::decode_with(&bytes, config.decode_mode) {
        Ok(e) => e,
        Err(e) => return Ok(VerifyReport::failed(None, crate::EXIT_INVALID, e.to_string())),
    };
    let proof_type = decoded.proof_type();

    let config = VerifierConfig {
        policy: PolicyMode::Development,
        ..config
    };
    let (verifier, caps) = UniversalVerifier::new(config);
    verifier
        .set_primary_backend(&caps.module_manager, Arc::new(MockBackend::new()))
        .context("failed to configure mock backend")?;

    if let Some(path) = vk {
        if proof_type.uses_verification_key() {
            let key = crate::read_input(path)?;
            verifier
                .register_verification_key(&caps.module_manager, proof_type, &key)
                .context("failed to register verification key")?;
        } else {
            tracing::warn!(%proof_type, "ignoring --vk for a proof system without keys");
        }
    }

    let mut report = match verifier.verify_envelope(&bytes) {
        Ok(receipt) => VerifyReport {
            valid: true,
            proof_type: Some(proof_type),
            backend: Some(receipt.backend.name),
            error: None,
            audit_digests: Vec::new(),
            exit_code: crate::EXIT_OK,
        },
        Err(VerifierError::Dispatch(e)) if e.is_invalid_proof() => {
            VerifyReport::failed(Some(proof_type), crate::EXIT_INVALID, e.to_string())
        }
        Err(VerifierError::Codec(e)) => {
            VerifyReport::failed(Some(proof_type), crate::EXIT_INVALID, e.to_string())
        }
        Err(VerifierError::Dispatch(e)) => {
            VerifyReport::failed(Some(proof_type), crate::EXIT_ERROR, e.to_string())
        }
    };
    report.audit_digests = verifier.with_audit(|trail| {
        trail
            .compute_digests()
            .into_iter()
            .map(|(_, digest)| digest)
            .collect()
    });
    Ok(report)
}
