//! # uzkv CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uzkv_cli::envelope::{run_envelope, EnvelopeArgs};
use uzkv_cli::prove::{run_mock_prove, MockProveArgs};
use uzkv_cli::statement::{run_statement, StatementArgs};
use uzkv_cli::verify::{run_verify, VerifyArgs};
use uzkv_cli::vk::{run_vk_hash, VkHashArgs};

/// Universal ZK verifier toolchain.
///
/// Builds and inspects proof envelopes and public statements, hashes
/// verification keys, and verifies envelopes locally.
#[derive(Parser, Debug)]
#[command(name = "uzkv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a verifier configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the SHA-256 hash of a verification key file.
    VkHash(VkHashArgs),

    /// Encode or decode a public statement.
    Statement(StatementArgs),

    /// Encode or decode a proof envelope.
    Envelope(EnvelopeArgs),

    /// Produce a proof accepted by the mock backend.
    MockProve(MockProveArgs),

    /// Verify an envelope file with an in-process verifier.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "uzkv starting");

    let result = match cli.command {
        Commands::VkHash(args) => run_vk_hash(&args),
        Commands::Statement(args) => run_statement(&args),
        Commands::Envelope(args) => run_envelope(&args),
        Commands::MockProve(args) => run_mock_prove(&args),
        Commands::Verify(args) => run_verify(&args, cli.config.as_deref()),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(uzkv_cli::EXIT_INVALID)
        }
    }
}
