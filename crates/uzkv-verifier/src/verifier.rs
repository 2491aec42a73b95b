//! # Universal Verifier
//!
//! The public call surface. One `parking_lot::Mutex` guards the ledger, the
//! routing table, and the audit log together, and every operation holds it
//! from its first check to its last write. Operations are therefore
//! strictly ordered, and a nullifier check-and-set can never interleave
//! with another call.
//!
//! Backend calls run synchronously under the lock. A slow backend delays
//! other callers; it never lets them observe a half-finished dispatch.
//!
//! ## Security Invariant
//!
//! The pause gate is consulted before the registry, before any capability,
//! and before any backend, on every path including fallback routes.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uzkv_core::{DecodeMode, Nullifier, ProofEnvelope, ProofType, VkHash};
use uzkv_ledger::{
    Capabilities, LedgerError, LedgerState, LedgerStats, ModuleManagerCapability,
    PauseCapability, RegistrationOutcome, UnpauseCapability,
};
use uzkv_zkp::{
    BackendIdentity, InputLimits, ProofPolicy, SecurityRequirement, VerifyBackend,
};

use crate::audit::{AuditEntry, AuditEvent, AuditLog, AuditTrail};
use crate::config::VerifierConfig;
use crate::dispatch::{BatchMarks, Call};
use crate::error::{DispatchError, VerifierError};
use crate::router::{RouteSlot, Router};

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    /// Proof system.
    pub proof_type: ProofType,
    /// Program id from the envelope, when dispatched from one.
    pub program_id: Option<u32>,
    /// Key hash the proof was checked against.
    pub vk_hash: VkHash,
    /// Backend that accepted the proof.
    pub backend: BackendIdentity,
    /// Route the backend was selected from.
    pub slot: RouteSlot,
    /// Nullifier consumed, if the public inputs carried one.
    pub nullifier: Option<Nullifier>,
}

/// State guarded by the verifier lock.
pub(crate) struct Inner<A> {
    pub(crate) ledger: LedgerState,
    pub(crate) router: Router,
    pub(crate) audit: A,
    pub(crate) limits: InputLimits,
    pub(crate) security: SecurityRequirement,
}

/// Single verification entry point for every supported proof system.
///
/// ```rust
/// use std::sync::Arc;
/// use uzkv_core::{Nullifier, ProofType, PublicStatement};
/// use uzkv_verifier::{UniversalVerifier, VerifierConfig};
/// use uzkv_zkp::{MockBackend, PolicyMode};
///
/// let config = VerifierConfig { policy: PolicyMode::Development, ..Default::default() };
/// let (verifier, caps) = UniversalVerifier::new(config);
/// verifier
///     .set_primary_backend(&caps.module_manager, Arc::new(MockBackend::new()))
///     .unwrap();
///
/// let vk_hash = verifier
///     .register_verification_key(&caps.module_manager, ProofType::Groth16, b"vk")
///     .unwrap();
/// let inputs = PublicStatement::new([0; 32], [0; 32], Nullifier::from_bytes([7; 32]), 1, Vec::<u8>::new())
///     .unwrap()
///     .encode();
/// let proof = MockBackend::prove(ProofType::Groth16, &vk_hash, &inputs);
///
/// assert_eq!(verifier.verify(ProofType::Groth16, &proof, &inputs, vk_hash), Ok(true));
/// assert!(verifier.verify(ProofType::Groth16, &proof, &inputs, vk_hash).is_err());
/// ```
pub struct UniversalVerifier<A: AuditLog = AuditTrail> {
    inner: Mutex<Inner<A>>,
    policy: ProofPolicy,
    decode_mode: DecodeMode,
    max_batch_size: usize,
}

impl UniversalVerifier<AuditTrail> {
    /// A verifier with an in-memory audit trail, no backends, and an empty
    /// registry, plus the capability tokens that administer it.
    pub fn new(config: VerifierConfig) -> (Self, Capabilities) {
        let audit = AuditTrail::new(config.audit_capacity);
        Self::with_audit_log(config, audit)
    }
}

impl<A: AuditLog> UniversalVerifier<A> {
    /// A verifier writing to a caller-supplied audit log.
    pub fn with_audit_log(config: VerifierConfig, audit: A) -> (Self, Capabilities) {
        let (ledger, caps) = LedgerState::new();
        tracing::debug!(
            ledger = %ledger.id(),
            policy = ?config.policy,
            require_post_quantum = config.security.require_post_quantum,
            min_security_bits = config.security.min_security_bits,
            decode_mode = %config.decode_mode,
            max_batch_size = config.max_batch_size,
            "universal verifier created"
        );
        let verifier = Self {
            inner: Mutex::new(Inner {
                ledger,
                router: Router::new(),
                audit,
                limits: config.limits,
                security: config.security,
            }),
            policy: ProofPolicy::new(config.policy).with_security(config.security),
            decode_mode: config.decode_mode,
            max_batch_size: config.max_batch_size,
        };
        (verifier, caps)
    }

    /// Backend policy in force.
    pub fn policy(&self) -> ProofPolicy {
        self.policy
    }

    // -- Verification -------------------------------------------------------

    /// Verify one proof.
    ///
    /// Returns `Ok(true)` when the proof is accepted and its nullifier (if
    /// any) consumed, `Ok(false)` when the backend reports the proof
    /// mathematically invalid, and `Err` for every other failure.
    pub fn verify(
        &self,
        proof_type: ProofType,
        proof: &[u8],
        public_inputs: &[u8],
        vk_hash: VkHash,
    ) -> Result<bool, DispatchError> {
        verdict(self.dispatch(proof_type, proof, public_inputs, vk_hash))
    }

    /// Verify one proof and describe what happened. A mathematically
    /// invalid proof is an `Err` here.
    pub fn dispatch(
        &self,
        proof_type: ProofType,
        proof: &[u8],
        public_inputs: &[u8],
        vk_hash: VkHash,
    ) -> Result<DispatchReceipt, DispatchError> {
        let call = Call {
            proof_type,
            proof,
            public_inputs,
            vk_hash,
            program_id: None,
        };
        self.inner.lock().dispatch(&call, None)
    }

    /// Decode an encoded [`ProofEnvelope`] with the configured
    /// [`DecodeMode`] and dispatch it.
    pub fn verify_envelope(&self, bytes: &[u8]) -> Result<DispatchReceipt, VerifierError> {
        let envelope = ProofEnvelope::decode_with(bytes, self.decode_mode).map_err(|e| {
            tracing::warn!(error = %e, len = bytes.len(), "rejected undecodable envelope");
            e
        })?;
        let call = Call {
            proof_type: envelope.proof_type(),
            proof: envelope.proof(),
            public_inputs: envelope.public_inputs(),
            vk_hash: envelope.vk_hash(),
            program_id: Some(envelope.program_id()),
        };
        Ok(self.inner.lock().dispatch(&call, None)?)
    }

    /// Verify parallel arrays of proofs and public inputs sharing one key.
    ///
    /// The whole call fails, with no side effects, when the verifier is
    /// paused, the proof type falls short of the security requirement, the
    /// arrays differ in length, the batch exceeds the configured
    /// maximum, or the key is not registered. Otherwise each element is
    /// dispatched independently in array order and gets its own result. When
    /// two elements carry the same nullifier the first accepted one consumes
    /// it and later ones fail with
    /// [`ReplayError::NullifierAlreadyMarked`](uzkv_ledger::ReplayError::NullifierAlreadyMarked).
    pub fn batch_verify<P, I>(
        &self,
        proof_type: ProofType,
        proofs: &[P],
        public_inputs: &[I],
        vk_hash: VkHash,
    ) -> Result<Vec<Result<bool, DispatchError>>, DispatchError>
    where
        P: AsRef<[u8]>,
        I: AsRef<[u8]>,
    {
        let mut inner = self.inner.lock();

        let precheck = self.check_batch(
            &inner,
            proof_type,
            proofs.len(),
            public_inputs.len(),
            vk_hash,
        );
        if let Err(e) = precheck {
            inner.record_dispatch(proof_type, vk_hash, None, &Err(e.clone()));
            return Err(e);
        }

        let mut marks = BatchMarks::new();
        let mut results = Vec::with_capacity(proofs.len());
        for (index, (proof, inputs)) in proofs.iter().zip(public_inputs).enumerate() {
            let call = Call {
                proof_type,
                proof: proof.as_ref(),
                public_inputs: inputs.as_ref(),
                vk_hash,
                program_id: None,
            };
            results.push(verdict(inner.dispatch(&call, Some(marks.at(index)))));
        }
        tracing::debug!(
            %proof_type,
            size = results.len(),
            accepted = results.iter().filter(|r| matches!(r, Ok(true))).count(),
            "batch verified"
        );
        Ok(results)
    }

    /// Batch-level checks. Nothing is consumed or counted when these fail.
    fn check_batch(
        &self,
        inner: &Inner<A>,
        proof_type: ProofType,
        proofs: usize,
        public_inputs: usize,
        vk_hash: VkHash,
    ) -> Result<(), DispatchError> {
        inner.ledger.ensure_active()?;
        inner.security.check(proof_type)?;
        if proofs != public_inputs {
            return Err(DispatchError::InvalidInputSize(format!(
                "{proofs} proofs but {public_inputs} public inputs"
            )));
        }
        if proofs > self.max_batch_size {
            return Err(DispatchError::InvalidInputSize(format!(
                "batch of {proofs} exceeds maximum of {}",
                self.max_batch_size
            )));
        }
        if proof_type.uses_verification_key()
            && !inner.ledger.registry().is_registered(proof_type, &vk_hash)
        {
            return Err(DispatchError::VkNotRegistered {
                proof_type,
                vk_hash,
            });
        }
        Ok(())
    }

    // -- Registry -----------------------------------------------------------

    /// Register a verification key and return its hash. Registering the
    /// same bytes again is a no-op that returns the same hash.
    pub fn register_verification_key(
        &self,
        cap: &ModuleManagerCapability,
        proof_type: ProofType,
        vk_bytes: &[u8],
    ) -> Result<VkHash, LedgerError> {
        let mut inner = self.inner.lock();
        let registration = inner.ledger.register_vk(cap, proof_type, vk_bytes)?;
        let previous = registration.outcome == RegistrationOutcome::AlreadyRegistered;
        tracing::info!(
            %proof_type,
            vk_hash = %registration.vk_hash,
            already_registered = previous,
            "verification key registered"
        );
        inner.audit.record(AuditEntry::new(AuditEvent::Registry {
            proof_type,
            vk_hash: registration.vk_hash,
            previous,
            new: true,
        }));
        Ok(registration.vk_hash)
    }

    /// Remove a verification key (administrative rollback).
    pub fn remove_verification_key(
        &self,
        cap: &ModuleManagerCapability,
        proof_type: ProofType,
        vk_hash: VkHash,
    ) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock();
        inner.ledger.remove_vk(cap, proof_type, &vk_hash)?;
        tracing::warn!(%proof_type, %vk_hash, "verification key removed");
        inner.audit.record(AuditEntry::new(AuditEvent::Registry {
            proof_type,
            vk_hash,
            previous: true,
            new: false,
        }));
        Ok(())
    }

    /// Whether `vk_hash` is registered for `proof_type`. Available while
    /// paused.
    pub fn is_vk_registered(&self, proof_type: ProofType, vk_hash: VkHash) -> bool {
        self.inner
            .lock()
            .ledger
            .registry()
            .is_registered(proof_type, &vk_hash)
    }

    // -- Nullifiers ---------------------------------------------------------

    /// Consume a nullifier outside of verification.
    pub fn mark_nullifier_used(&self, nullifier: Nullifier) -> Result<(), LedgerError> {
        self.inner.lock().ledger.mark_nullifier_used(nullifier)?;
        tracing::debug!(%nullifier, "nullifier marked");
        Ok(())
    }

    /// Whether a nullifier has been consumed. Available while paused.
    pub fn is_nullifier_used(&self, nullifier: Nullifier) -> bool {
        self.inner.lock().ledger.is_nullifier_used(&nullifier)
    }

    // -- Pause gate ---------------------------------------------------------

    /// Engage the pause gate. Idempotent.
    pub fn pause(&self, cap: &PauseCapability) -> Result<(), DispatchError> {
        let mut inner = self.inner.lock();
        let previous = inner.ledger.pause(cap)?;
        let new = inner.ledger.operational_state();
        tracing::warn!(%previous, "verifier paused");
        inner.audit.record(AuditEntry::new(AuditEvent::Operational { previous, new }));
        Ok(())
    }

    /// Release the pause gate. Idempotent.
    pub fn unpause(&self, cap: &UnpauseCapability) -> Result<(), DispatchError> {
        let mut inner = self.inner.lock();
        let previous = inner.ledger.unpause(cap)?;
        let new = inner.ledger.operational_state();
        tracing::warn!(%previous, "verifier unpaused");
        inner.audit.record(AuditEntry::new(AuditEvent::Operational { previous, new }));
        Ok(())
    }

    /// Whether the pause gate is engaged.
    pub fn is_paused(&self) -> bool {
        self.inner.lock().ledger.is_paused()
    }

    // -- Backend configuration ----------------------------------------------

    /// Install the primary backend, returning the one it replaced.
    pub fn set_primary_backend(
        &self,
        cap: &ModuleManagerCapability,
        backend: Arc<dyn VerifyBackend>,
    ) -> Result<Option<BackendIdentity>, DispatchError> {
        self.configure(cap, RouteSlot::Primary, Some(backend))
    }

    /// Remove the primary backend.
    pub fn clear_primary_backend(
        &self,
        cap: &ModuleManagerCapability,
    ) -> Result<Option<BackendIdentity>, DispatchError> {
        self.configure(cap, RouteSlot::Primary, None)
    }

    /// Install the fallback backend for `proof_type`. The backend must
    /// support that type.
    pub fn set_fallback_backend(
        &self,
        cap: &ModuleManagerCapability,
        proof_type: ProofType,
        backend: Arc<dyn VerifyBackend>,
    ) -> Result<Option<BackendIdentity>, DispatchError> {
        if !backend.supports(proof_type) {
            return Err(DispatchError::UnsupportedProofType(proof_type));
        }
        self.configure(cap, RouteSlot::Fallback(proof_type), Some(backend))
    }

    /// Remove the fallback backend for `proof_type`.
    pub fn remove_fallback_backend(
        &self,
        cap: &ModuleManagerCapability,
        proof_type: ProofType,
    ) -> Result<Option<BackendIdentity>, DispatchError> {
        self.configure(cap, RouteSlot::Fallback(proof_type), None)
    }

    /// Backend configuration is allowed while paused so a faulty engine can
    /// be swapped during an incident.
    fn configure(
        &self,
        cap: &ModuleManagerCapability,
        slot: RouteSlot,
        backend: Option<Arc<dyn VerifyBackend>>,
    ) -> Result<Option<BackendIdentity>, DispatchError> {
        let mut inner = self.inner.lock();
        inner.ledger.authorize(cap)?;
        let new = backend.as_ref().map(|b| b.identity());
        if let Some(identity) = &new {
            self.policy.validate(identity)?;
        }
        let previous = match backend {
            Some(b) => inner.router.set(slot, b),
            None => inner.router.clear(slot),
        }
        .map(|b| b.identity());
        tracing::info!(
            %slot,
            previous = ?previous.as_ref().map(|b| &b.name),
            new = ?new.as_ref().map(|b| &b.name),
            "backend route configured"
        );
        inner.audit.record(AuditEntry::new(AuditEvent::BackendConfigured {
            slot,
            previous: previous.clone(),
            new,
        }));
        Ok(previous)
    }

    /// Every configured route.
    pub fn routes(&self) -> Vec<(RouteSlot, BackendIdentity)> {
        self.inner.lock().router.routes()
    }

    // -- Introspection ------------------------------------------------------

    /// Current counters.
    pub fn stats(&self) -> LedgerStats {
        self.inner.lock().ledger.stats()
    }

    /// Read the audit log under the verifier lock.
    pub fn with_audit<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        f(&self.inner.lock().audit)
    }
}

impl<A: AuditLog> std::fmt::Debug for UniversalVerifier<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("UniversalVerifier")
            .field("ledger", &inner.ledger.id())
            .field("state", &inner.ledger.operational_state())
            .field("router", &inner.router)
            .field("policy", &self.policy.mode())
            .finish()
    }
}

/// Boolean view of a dispatch: invalid proofs are `false`, everything else
/// that failed stays an error.
fn verdict(result: Result<DispatchReceipt, DispatchError>) -> Result<bool, DispatchError> {
    match result {
        Ok(_) => Ok(true),
        Err(e) if e.is_invalid_proof() => Ok(false),
        Err(e) => Err(e),
    }
}
