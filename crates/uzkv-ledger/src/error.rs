//! # Ledger Errors
//!
//! Every variant is fatal to the call that produced it and to nothing else.
//! No error path leaves the registry or nullifier ledger partially updated.

use thiserror::Error;
use uzkv_core::{Nullifier, ProofType, VkHash};

use crate::capability::CapabilityKind;

/// Pause-gate and capability failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The verifier is paused.
    #[error("verifier is paused")]
    Paused,

    /// The presented capability was not minted by this ledger.
    #[error("unauthorized: {capability} capability does not belong to this verifier")]
    Unauthorized {
        /// The capability that was checked.
        capability: CapabilityKind,
    },
}

/// Verification-key registry failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No key is registered under this hash for this proof type.
    #[error("no {proof_type} verification key registered with hash {vk_hash}")]
    NotRegistered {
        /// Proof system namespace.
        proof_type: ProofType,
        /// Hash that was looked up.
        vk_hash: VkHash,
    },

    /// Different key bytes produced a hash that is already registered.
    #[error("{proof_type} verification key hash {vk_hash} is already bound to different key bytes")]
    HashCollision {
        /// Proof system namespace.
        proof_type: ProofType,
        /// The colliding hash.
        vk_hash: VkHash,
    },
}

/// Anti-replay failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The nullifier was consumed by an earlier operation.
    #[error("nullifier {nullifier} has already been used")]
    NullifierReplay {
        /// The replayed nullifier.
        nullifier: Nullifier,
    },

    /// The nullifier was consumed by an earlier element of the same batch.
    #[error("nullifier {nullifier} was already marked by batch element {first_index}")]
    NullifierAlreadyMarked {
        /// The replayed nullifier.
        nullifier: Nullifier,
        /// Index of the batch element that consumed it.
        first_index: usize,
    },
}

/// Any ledger failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Pause gate or capability check failed.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Nullifier replay.
    #[error(transparent)]
    Replay(#[from] ReplayError),
}
