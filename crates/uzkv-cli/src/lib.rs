//! # uzkv-cli: Operator CLI for the Universal ZK Verifier
//!
//! Provides the `uzkv` command-line interface for building and inspecting
//! proof envelopes and checking them against an in-process verifier.
//!
//! ## Subcommands
//!
//! - `uzkv vk-hash`: SHA-256 hash of a verification key file.
//! - `uzkv statement`: Encode or decode a public statement.
//! - `uzkv envelope`: Encode or decode a proof envelope.
//! - `uzkv mock-prove`: Produce a proof the mock backend accepts.
//! - `uzkv verify`: Verify an envelope file locally.
//!
//! ```bash
//! uzkv mock-prove --proof-type groth16 --vk vk.bin --public-inputs stmt.bin -o proof.bin
//! uzkv envelope encode --proof-type groth16 --program-id 1 --vk vk.bin \
//!     --proof proof.bin --public-inputs stmt.bin -o env.bin
//! uzkv verify env.bin --vk vk.bin
//! ```
//!
//! ## Exit Codes
//!
//! `0` success or valid proof, `1` invalid proof or bad input, `2`
//! verification error (paused, unsupported, backend failure).
//!
//! ## Crate Policy
//!
//! Handlers delegate to the library crates. No verification logic lives
//! here.

pub mod envelope;
pub mod prove;
pub mod statement;
pub mod verify;
pub mod vk;

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use uzkv_verifier::VerifierConfig;

/// Exit code for a valid proof or a successful command.
pub const EXIT_OK: u8 = 0;
/// Exit code for an invalid proof or unusable input.
pub const EXIT_INVALID: u8 = 1;
/// Exit code for a verification that could not be carried out.
pub const EXIT_ERROR: u8 = 2;

/// Read a whole file.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Write `bytes` to `path`, replacing any existing file.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), len = bytes.len(), "wrote output");
    Ok(())
}

/// Decode a hex argument, with or without a `0x` prefix.
pub fn parse_hex(raw: &str) -> Result<Vec<u8>> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).with_context(|| format!("invalid hex: {raw:?}"))
}

/// clap value parser for 32-byte hex arguments.
pub fn parse_bytes32(raw: &str) -> std::result::Result<[u8; 32], String> {
    let bytes = parse_hex(raw).map_err(|e| format!("{e:#}"))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| format!("expected 32 bytes, got {}", bytes.len()))
}

/// Load verifier configuration from `path` if given, otherwise from
/// defaults. Environment overrides apply in both cases.
pub fn load_config(path: Option<&Path>) -> Result<VerifierConfig> {
    let config = match path {
        Some(p) => VerifierConfig::from_yaml_file(p)
            .with_context(|| format!("failed to load config {}", p.display()))?,
        None => VerifierConfig::default(),
    };
    config
        .with_env_overrides()
        .context("invalid UZKV_* environment override")
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
