//! # Statement Subcommand
//!
//! Encodes and decodes the standardized public statement carried in a
//! proof's public inputs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use uzkv_core::{Nullifier, PublicStatement};

/// Arguments for `uzkv statement`.
#[derive(Args, Debug)]
pub struct StatementArgs {
    #[command(subcommand)]
    pub command: StatementCommand,
}

/// Statement subcommands.
#[derive(Subcommand, Debug)]
pub enum StatementCommand {
    /// Encode a statement to its wire form.
    Encode {
        /// State root (32-byte hex).
        #[arg(long, value_parser = crate::parse_bytes32)]
        merkle_root: [u8; 32],
        /// Acting party's public key (32-byte hex).
        #[arg(long, value_parser = crate::parse_bytes32)]
        public_key: [u8; 32],
        /// One-time token (32-byte hex). All zeros means none.
        #[arg(long)]
        nullifier: Nullifier,
        /// Application value.
        #[arg(long)]
        value: u128,
        /// Application-defined trailing bytes (hex).
        #[arg(long)]
        extra: Option<String>,
        /// Output file.
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Decode a statement file and print it as JSON.
    Decode {
        /// Encoded statement file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// JSON view of a [`PublicStatement`]. The value is a decimal string so
/// the full `u128` range survives JSON consumers.
#[derive(Debug, Serialize)]
pub struct StatementView {
    merkle_root: String,
    public_key: String,
    nullifier: Nullifier,
    value: String,
    extra: String,
}

impl From<&PublicStatement> for StatementView {
    fn from(s: &PublicStatement) -> Self {
        Self {
            merkle_root: hex::encode(s.merkle_root()),
            public_key: hex::encode(s.public_key()),
            nullifier: s.nullifier(),
            value: s.value().to_string(),
            extra: hex::encode(s.extra()),
        }
    }
}

/// Execute the statement subcommand.
pub fn run_statement(args: &StatementArgs) -> Result<u8> {
    match &args.command {
        StatementCommand::Encode {
            merkle_root,
            public_key,
            nullifier,
            value,
            extra,
            output,
        } => {
            let extra = extra.as_deref().map(crate::parse_hex).transpose()?;
            let len = cmd_encode(
                *merkle_root,
                *public_key,
                *nullifier,
                *value,
                extra.unwrap_or_default(),
                output,
            )?;
            println!("OK: wrote {len}-byte statement to {}", output.display());
            Ok(crate::EXIT_OK)
        }
        StatementCommand::Decode { file } => match cmd_decode(file)? {
            Ok(view) => {
                crate::print_json(&view)?;
                Ok(crate::EXIT_OK)
            }
            Err(reason) => {
                println!("FAIL: {reason}");
                Ok(crate::EXIT_INVALID)
            }
        },
    }
}

fn cmd_encode(
    merkle_root: [u8; 32],
    public_key: [u8; 32],
    nullifier: Nullifier,
    value: u128,
    extra: Vec<u8>,
    output: &Path,
) -> Result<usize> {
    let statement = PublicStatement::new(merkle_root, public_key, nullifier, value, extra)
        .context("statement does not fit the wire format")?;
    let bytes = statement.encode();
    crate::write_output(output, &bytes)?;
    Ok(bytes.len())
}

/// Decode a statement file. The inner error is a decode failure of the
/// file's contents, reported rather than propagated.
fn cmd_decode(file: &Path) -> Result<std::result::Result<StatementView, String>> {
    let bytes = crate::read_input(file)?;
    Ok(PublicStatement::decode(&bytes)
        .map(|s| StatementView::from(&s))
        .map_err(|e| e.to_string()))
}
