//! # VK Hash Subcommand
//!
//! Prints the SHA-256 hash under which a verification key file would be
//! registered.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use uzkv_core::VkHash;

/// Arguments for `uzkv vk-hash`.
#[derive(Args, Debug)]
pub struct VkHashArgs {
    /// Verification key file (raw bytes).
    #[arg(value_name = "VK_FILE")]
    pub vk_file: PathBuf,
}

#[derive(Debug, Serialize)]
struct VkHashReport {
    vk_hash: VkHash,
    len: usize,
}

/// Execute the vk-hash subcommand.
pub fn run_vk_hash(args: &VkHashArgs) -> Result<u8> {
    let (vk_hash, len) = hash_file(&args.vk_file)?;
    crate::print_json(&VkHashReport { vk_hash, len })?;
    Ok(crate::EXIT_OK)
}

/// Hash a key file. Returns the hash and the key length.
pub fn hash_file(path: &Path) -> Result<(VkHash, usize)> {
    let bytes = crate::read_input(path)?;
    Ok((VkHash::of(&bytes), bytes.len()))
}
