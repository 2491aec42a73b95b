//! # Verification-Key Registry
//!
//! Maps `(proof_type, SHA-256(key_bytes))` to the registered key. The hash
//! is the identifier used everywhere else; the bytes are kept so they can be
//! handed to backends at dispatch.
//!
//! ## Security Invariant
//!
//! - Namespaced per proof type: a hash registered for Groth16 does not
//!   authorize a PLONK proof.
//! - Registration of identical bytes is idempotent.
//! - Registration of different bytes under an existing hash is rejected
//!   with [`RegistryError::HashCollision`] rather than silently accepted.
//! - Append-only in steady state. [`VkRegistry::remove`] exists for
//!   administrative rollback.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uzkv_core::{ProofType, VkHash};

use crate::error::RegistryError;

/// A registered verification key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VkRecord {
    key_bytes: Vec<u8>,
    registered_at: DateTime<Utc>,
}

impl VkRecord {
    /// The raw key bytes.
    pub fn key_bytes(&self) -> &[u8] {
        &self.key_bytes
    }

    /// When the key was first registered.
    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

/// Whether a registration created a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// The key was not present and has been added.
    Inserted,
    /// The identical key was already present. Nothing changed.
    AlreadyRegistered,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Hash of the registered key.
    pub vk_hash: VkHash,
    /// Whether this call inserted it.
    pub outcome: RegistrationOutcome,
}

/// The registry.
#[derive(Debug, Default)]
pub struct VkRegistry {
    keys: BTreeMap<(ProofType, VkHash), VkRecord>,
}

impl VkRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `key_bytes` and register it under `proof_type`.
    pub fn register(
        &mut self,
        proof_type: ProofType,
        key_bytes: &[u8],
    ) -> Result<Registration, RegistryError> {
        let vk_hash = VkHash::of(key_bytes);
        let outcome = match self.keys.entry((proof_type, vk_hash)) {
            Entry::Occupied(existing) => {
                if existing.get().key_bytes != key_bytes {
                    return Err(RegistryError::HashCollision {
                        proof_type,
                        vk_hash,
                    });
                }
                RegistrationOutcome::AlreadyRegistered
            }
            Entry::Vacant(slot) => {
                slot.insert(VkRecord {
                    key_bytes: key_bytes.to_vec(),
                    registered_at: Utc::now(),
                });
                RegistrationOutcome::Inserted
            }
        };
        Ok(Registration { vk_hash, outcome })
    }

    /// Whether `vk_hash` is registered for `proof_type`.
    pub fn is_registered(&self, proof_type: ProofType, vk_hash: &VkHash) -> bool {
        self.keys.contains_key(&(proof_type, *vk_hash))
    }

    /// The registered record, if any.
    pub fn get(&self, proof_type: ProofType, vk_hash: &VkHash) -> Option<&VkRecord> {
        self.keys.get(&(proof_type, *vk_hash))
    }

    /// The registered key bytes, if any.
    pub fn key_bytes(&self, proof_type: ProofType, vk_hash: &VkHash) -> Option<&[u8]> {
        self.get(proof_type, vk_hash).map(VkRecord::key_bytes)
    }

    /// Remove a key. Fails if it is not registered.
    pub fn remove(
        &mut self,
        proof_type: ProofType,
        vk_hash: &VkHash,
    ) -> Result<VkRecord, RegistryError> {
        self.keys
            .remove(&(proof_type, *vk_hash))
            .ok_or(RegistryError::NotRegistered {
                proof_type,
                vk_hash: *vk_hash,
            })
    }

    /// Number of registered keys across all proof types.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Registered `(proof_type, vk_hash)` pairs in order.
    pub fn keys(&self) -> impl Iterator<Item = (ProofType, VkHash)> + '_ {
        self.keys.keys().copied()
    }
}
