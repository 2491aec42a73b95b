//! # Mock-Prove Subcommand
//!
//! Produces proofs the SHA-256 mock backend accepts, for exercising the
//! verification path without a real proving system.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use uzkv_core::ProofType;
use uzkv_zkp::MockBackend;

/// Arguments for `uzkv mock-prove`.
#[derive(Args, Debug)]
pub struct MockProveArgs {
    /// Proof system: groth16, plonk or stark.
    #[arg(long)]
    pub proof_type: ProofType,
    /// Verification key file the proof is bound to. Omit for STARK.
    #[arg(long)]
    pub vk: Option<PathBuf>,
    /// Public inputs file.
    #[arg(long)]
    pub public_inputs: PathBuf,
    /// Output file for the proof bytes.
    #[arg(long, short)]
    pub output: PathBuf,
}

/// Execute the mock-prove subcommand.
pub fn run_mock_prove(args: &MockProveArgs) -> Result<u8> {
    let vk_hash = crate::envelope::resolve_vk_hash(args.proof_type, args.vk.as_deref(), None)?;
    let inputs = crate::read_input(&args.public_inputs)?;
    let proof = MockBackend::prove(args.proof_type, &vk_hash, &inputs);
    crate::write_output(&args.output, &proof)?;
    tracing::info!(proof_type = %args.proof_type, %vk_hash, "mock proof written");
    println!(
        "OK: wrote {}-byte mock {} proof to {}",
        proof.len(),
        args.proof_type,
        args.output.display()
    );
    Ok(crate::EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uzkv_core::VkHash;

    #[test]
    fn proof_matches_library_prover() {
        let dir = tempfile::tempdir().unwrap();
        let vk = dir.path().join("vk.bin");
        let inputs = dir.path().join("inputs.bin");
        let out = dir.path().join("proof.bin");
        std::fs::write(&vk, b"plonk key").unwrap();
        std::fs::write(&inputs, b"inputs").unwrap();

        let args = MockProveArgs {
            proof_type: ProofType::Plonk,
            vk: Some(vk),
            public_inputs: inputs,
            output: out.clone(),
        };
        assert_eq!(run_mock_prove(&args).unwrap(), crate::EXIT_OK);
        assert_eq!(
            std::fs::read(&out).unwrap(),
            MockBackend::prove(ProofType::Plonk, &VkHash::of(b"plonk key"), b"inputs")
        );
    }

    #[test]
    fn keyed_type_without_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = dir.path().join("inputs.bin");
        std::fs::write(&inputs, b"x").unwrap();
        let args = MockProveArgs {
            proof_type: ProofType::Groth16,
            vk: None,
            public_inputs: inputs,
            output: dir.path().join("proof.bin"),
        };
        assert!(run_mock_prove(&args).is_err());
    }
}
