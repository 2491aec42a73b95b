//! # Envelope Subcommand
//!
//! Builds proof envelopes from raw files and inspects encoded ones.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use uzkv_core::{DecodeMode, ProofEnvelope, ProofType, VkHash};

use crate::statement::StatementView;

/// Arguments for `uzkv envelope`.
#[derive(Args, Debug)]
pub struct EnvelopeArgs {
    #[command(subcommand)]
    pub command: EnvelopeCommand,
}

/// Envelope subcommands.
#[derive(Subcommand, Debug)]
pub enum EnvelopeCommand {
    /// Encode an envelope.
    Encode {
        /// Proof system: groth16, plonk or stark.
        #[arg(long)]
        proof_type: ProofType,
        /// Application program identifier.
        #[arg(long)]
        program_id: u32,
        /// Verification key file; its SHA-256 becomes the envelope's key hash.
        #[arg(long, conflicts_with = "vk_hash")]
        vk: Option<PathBuf>,
        /// Verification key hash (32-byte hex).
        #[arg(long)]
        vk_hash: Option<VkHash>,
        /// Proof bytes file.
        #[arg(long)]
        proof: PathBuf,
        /// Public inputs file.
        #[arg(long)]
        public_inputs: PathBuf,
        /// Output file.
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Decode an envelope file and print it as JSON.
    Decode {
        /// Encoded envelope file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Ignore bytes after the end of the envelope.
        #[arg(long)]
        lenient: bool,
    },
}

/// JSON view of a [`ProofEnvelope`].
#[derive(Debug, Serialize)]
pub struct EnvelopeView {
    version: u8,
    proof_type: ProofType,
    program_id: u32,
    vk_hash: VkHash,
    proof: String,
    public_inputs: String,
    /// Present when the public inputs decode as a statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    statement: Option<StatementView>,
}

impl From<&ProofEnvelope> for EnvelopeView {
    fn from(e: &ProofEnvelope) -> Self {
        Self {
            version: e.version(),
            proof_type: e.proof_type(),
            program_id: e.program_id(),
            vk_hash: e.vk_hash(),
            proof: hex::encode(e.proof()),
            public_inputs: hex::encode(e.public_inputs()),
            statement: e
                .decode_public_statement()
                .ok()
                .map(|s| StatementView::from(&s)),
        }
    }
}

/// Execute the envelope subcommand.
pub fn run_envelope(args: &EnvelopeArgs) -> Result<u8> {
    match &args.command {
        EnvelopeCommand::Encode {
            proof_type,
            program_id,
            vk,
            vk_hash,
            proof,
            public_inputs,
            output,
        } => {
            let vk_hash = resolve_vk_hash(*proof_type, vk.as_deref(), *vk_hash)?;
            let envelope = ProofEnvelope::new(
                *proof_type,
                *program_id,
                vk_hash,
                crate::read_input(proof)?,
                crate::read_input(public_inputs)?,
            )
            .context("envelope does not fit the wire format")?;
            let bytes = envelope.encode();
            crate::write_output(output, &bytes)?;
            println!(
                "OK: wrote {}-byte {} envelope to {}",
                bytes.len(),
                proof_type,
                output.display()
            );
            Ok(crate::EXIT_OK)
        }
        EnvelopeCommand::Decode { file, lenient } => {
            let mode = if *lenient {
                DecodeMode::Lenient
            } else {
                DecodeMode::Strict
            };
            match decode_file(file, mode)? {
                Ok(envelope) => {
                    crate::print_json(&EnvelopeView::from(&envelope))?;
                    Ok(crate::EXIT_OK)
                }
                Err(reason) => {
                    println!("FAIL: {reason}");
                    Ok(crate::EXIT_INVALID)
                }
            }
        }
    }
}

/// Key hash for an envelope: hashed from a key file, given directly, or
/// zero for proof systems without a verification key.
pub fn resolve_vk_hash(
    proof_type: ProofType,
    vk: Option<&Path>,
    vk_hash: Option<VkHash>,
) -> Result<VkHash> {
    match (vk, vk_hash) {
        (Some(path), _) => Ok(crate::vk::hash_file(path)?.0),
        (None, Some(hash)) => Ok(hash),
        (None, None) if !proof_type.uses_verification_key() => Ok(VkHash::ZERO),
        (None, None) => bail!("{proof_type} envelopes need --vk or --vk-hash"),
    }
}

/// Decode an envelope file. The inner error is a decode failure of the
/// file's contents.
pub fn decode_file(
    file: &Path,
    mode: DecodeMode,
) -> Result<std::result::Result<ProofEnvelope, String>> {
    let bytes = crate::read_input(file)?;
    Ok(ProofEnvelope::decode_with(&bytes, mode).map_err(|e| e.to_string()))
}
