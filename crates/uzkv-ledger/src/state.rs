//! # Ledger State
//!
//! The single authoritative store: registry, nullifiers, pause gate,
//! counters. Each mutating method checks, in order, the pause gate, then
//! the capability, then the operation's own preconditions, and mutates only
//! after all of them pass.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use uzkv_core::{Nullifier, ProofType, VkHash};

use crate::capability::{
    Capabilities, Capability, ModuleManagerCapability, PauseCapability, UnpauseCapability,
};
use crate::error::{AccessError, LedgerError, ReplayError};
use crate::nullifier::NullifierLedger;
use crate::operational::OperationalState;
use crate::registry::{Registration, VkRecord, VkRegistry};

/// Point-in-time counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Successful verifications since construction.
    pub verification_count: u64,
    /// Registered verification keys across all proof types.
    pub vk_count: usize,
    /// Consumed nullifiers.
    pub nullifier_count: usize,
    /// Current pause-gate state.
    pub state: OperationalState,
}

/// Authoritative verifier state.
#[derive(Debug)]
pub struct LedgerState {
    id: Uuid,
    operational: OperationalState,
    registry: VkRegistry,
    nullifiers: NullifierLedger,
    verification_count: u64,
}

impl LedgerState {
    /// A fresh, active ledger and the only capability tokens that will ever
    /// authorize it.
    pub fn new() -> (Self, Capabilities) {
        let id = Uuid::new_v4();
        let state = Self {
            id,
            operational: OperationalState::Active,
            registry: VkRegistry::new(),
            nullifiers: NullifierLedger::new(),
            verification_count: 0,
        };
        (state, Capabilities::mint(id))
    }

    /// Unique id of this ledger.
    pub fn id(&self) -> Uuid {
        self.id
    }

    // -- Gate ---------------------------------------------------------------

    /// Fail with [`AccessError::Paused`] if the gate is engaged.
    pub fn ensure_active(&self) -> Result<(), AccessError> {
        if self.operational.is_paused() {
            return Err(AccessError::Paused);
        }
        Ok(())
    }

    /// Fail with [`AccessError::Unauthorized`] if `cap` was minted elsewhere.
    pub fn authorize<C: Capability>(&self, cap: &C) -> Result<(), AccessError> {
        if cap.ledger_id() != self.id {
            let capability = C::KIND;
            tracing::warn!(%capability, "rejected capability from another verifier");
            return Err(AccessError::Unauthorized { capability });
        }
        Ok(())
    }

    /// Engage the gate. Returns the previous state; pausing a paused ledger
    /// is a no-op.
    pub fn pause(&mut self, cap: &PauseCapability) -> Result<OperationalState, AccessError> {
        self.authorize(cap)?;
        Ok(std::mem::replace(&mut self.operational, OperationalState::Paused))
    }

    /// Release the gate. Returns the previous state.
    pub fn unpause(&mut self, cap: &UnpauseCapability) -> Result<OperationalState, AccessError> {
        self.authorize(cap)?;
        Ok(std::mem::replace(&mut self.operational, OperationalState::Active))
    }

    /// Current gate state.
    pub fn operational_state(&self) -> OperationalState {
        self.operational
    }

    /// Whether the gate is engaged.
    pub fn is_paused(&self) -> bool {
        self.operational.is_paused()
    }

    // -- Registry -----------------------------------------------------------

    /// Register a verification key.
    pub fn register_vk(
        &mut self,
        cap: &ModuleManagerCapability,
        proof_type: ProofType,
        key_bytes: &[u8],
    ) -> Result<Registration, LedgerError> {
        self.ensure_active()?;
        self.authorize(cap)?;
        Ok(self.registry.register(proof_type, key_bytes)?)
    }

    /// Remove a verification key (administrative rollback).
    pub fn remove_vk(
        &mut self,
        cap: &ModuleManagerCapability,
        proof_type: ProofType,
        vk_hash: &VkHash,
    ) -> Result<VkRecord, LedgerError> {
        self.ensure_active()?;
        self.authorize(cap)?;
        Ok(self.registry.remove(proof_type, vk_hash)?)
    }

    /// Read access to the registry.
    pub fn registry(&self) -> &VkRegistry {
        &self.registry
    }

    // -- Nullifiers ---------------------------------------------------------

    /// Consume a nullifier.
    pub fn mark_nullifier_used(&mut self, nullifier: Nullifier) -> Result<(), LedgerError> {
        self.ensure_active()?;
        Ok(self.consume_nullifier(nullifier)?)
    }

    /// Consume a nullifier without consulting the pause gate. For callers
    /// that already passed [`ensure_active`](Self::ensure_active) within the
    /// same exclusive section, such as verification dispatch.
    pub fn consume_nullifier(&mut self, nullifier: Nullifier) -> Result<(), ReplayError> {
        self.nullifiers.mark_used(nullifier)
    }

    /// Whether a nullifier has been consumed.
    pub fn is_nullifier_used(&self, nullifier: &Nullifier) -> bool {
        self.nullifiers.is_used(nullifier)
    }

    // -- Counters -----------------------------------------------------------

    /// Count one successful verification.
    pub fn record_verification(&mut self) {
        self.verification_count = self.verification_count.saturating_add(1);
    }

    /// Current counters.
    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            verification_count: self.verification_count,
            vk_count: self.registry.len(),
            nullifier_count: self.nullifiers.len(),
            state: self.operational,
        }
    }
}
