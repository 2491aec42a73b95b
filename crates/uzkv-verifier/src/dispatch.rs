//! Per-call dispatch state machine. Runs with the verifier lock held.

use std::collections::HashMap;

use uzkv_core::{DecodeMode, Nullifier, ProofType, PublicStatement, VkHash};
use uzkv_ledger::ReplayError;
use uzkv_zkp::{BackendError, BackendIdentity, VerifyRequest};

use crate::audit::{AuditEntry, AuditEvent, AuditLog};
use crate::error::{DispatchError, RejectionReason};
use crate::verifier::{DispatchReceipt, Inner};

/// One verification request.
pub(crate) struct Call<'a> {
    pub(crate) proof_type: ProofType,
    pub(crate) proof: &'a [u8],
    pub(crate) public_inputs: &'a [u8],
    pub(crate) vk_hash: VkHash,
    pub(crate) program_id: Option<u32>,
}

/// Nullifiers consumed earlier in the current batch, by element index.
pub(crate) struct BatchMarks {
    first_seen: HashMap<Nullifier, usize>,
    index: usize,
}

impl BatchMarks {
    pub(crate) fn new() -> Self {
        Self {
            first_seen: HashMap::new(),
            index: 0,
        }
    }

    pub(crate) fn at(&mut self, index: usize) -> &mut Self {
        self.index = index;
        self
    }
}

impl<A: AuditLog> Inner<A> {
    /// Run one call to completion, then audit it.
    pub(crate) fn dispatch(
        &mut self,
        call: &Call<'_>,
        batch: Option<&mut BatchMarks>,
    ) -> Result<DispatchReceipt, DispatchError> {
        let mut routed = None;
        let result = self.run(call, batch, &mut routed);
        self.record_dispatch(call.proof_type, call.vk_hash, routed, &result);
        result
    }

    fn run(
        &mut self,
        call: &Call<'_>,
        batch: Option<&mut BatchMarks>,
        routed: &mut Option<BackendIdentity>,
    ) -> Result<DispatchReceipt, DispatchError> {
        self.ledger.ensure_active()?;
        self.security.check(call.proof_type)?;

        let verification_key = if call.proof_type.uses_verification_key() {
            let key = self
                .ledger
                .registry()
                .key_bytes(call.proof_type, &call.vk_hash)
                .ok_or(DispatchError::VkNotRegistered {
                    proof_type: call.proof_type,
                    vk_hash: call.vk_hash,
                })?;
            Some(key)
        } else {
            None
        };

        self.limits
            .check(call.proof_type, call.proof.len(), call.public_inputs.len())?;

        let (slot, backend) = self
            .router
            .select(call.proof_type)
            .ok_or(DispatchError::UnsupportedProofType(call.proof_type))?;
        let identity = backend.identity();
        *routed = Some(identity.clone());

        let request = VerifyRequest {
            proof_type: call.proof_type,
            proof: call.proof,
            public_inputs: call.public_inputs,
            vk_hash: call.vk_hash,
            verification_key,
        };
        let rejected = |reason| DispatchError::BackendRejected {
            backend: identity.name.clone(),
            reason,
        };
        match backend.verify(&request) {
            Ok(true) => {}
            Ok(false) => return Err(rejected(RejectionReason::InvalidProof)),
            Err(BackendError::Malformed(m)) => {
                return Err(rejected(RejectionReason::MalformedInput(m)))
            }
            Err(BackendError::Execution(m)) => {
                return Err(rejected(RejectionReason::ExecutionFailed(m)))
            }
            Err(BackendError::Unavailable(reason)) => {
                return Err(DispatchError::BackendUnavailable {
                    backend: identity.name.clone(),
                    reason,
                })
            }
        }

        // Lenient: padding after a statement must not hide its nullifier.
        let nullifier = PublicStatement::decode_with(call.public_inputs, DecodeMode::Lenient)
            .ok()
            .map(|s| s.nullifier())
            .filter(|n| !n.is_zero());
        if let Some(nullifier) = nullifier {
            self.consume(nullifier, batch)?;
        }

        self.ledger.record_verification();
        Ok(DispatchReceipt {
            proof_type: call.proof_type,
            program_id: call.program_id,
            vk_hash: call.vk_hash,
            backend: identity,
            slot,
            nullifier,
        })
    }

    /// First index in a batch wins; later indices see the earlier mark
    /// rather than a generic replay.
    fn consume(
        &mut self,
        nullifier: Nullifier,
        batch: Option<&mut BatchMarks>,
    ) -> Result<(), DispatchError> {
        match batch {
            Some(marks) => {
                if let Some(&first_index) = marks.first_seen.get(&nullifier) {
                    return Err(ReplayError::NullifierAlreadyMarked {
                        nullifier,
                        first_index,
                    }
                    .into());
                }
                self.ledger.consume_nullifier(nullifier)?;
                marks.first_seen.insert(nullifier, marks.index);
            }
            None => self.ledger.consume_nullifier(nullifier)?,
        }
        Ok(())
    }

    /// Audit and trace a finished (or refused) dispatch.
    pub(crate) fn record_dispatch(
        &mut self,
        proof_type: ProofType,
        vk_hash: VkHash,
        backend: Option<BackendIdentity>,
        result: &Result<DispatchReceipt, DispatchError>,
    ) {
        let backend_name = backend.as_ref().map(|b| b.name.as_str()).unwrap_or("-");
        match result {
            Ok(receipt) => tracing::info!(
                %proof_type,
                backend = backend_name,
                %vk_hash,
                nullifier = ?receipt.nullifier,
                "proof verified"
            ),
            Err(e) => tracing::warn!(
                %proof_type,
                backend = backend_name,
                %vk_hash,
                error = %e,
                "proof dispatch failed"
            ),
        }
        self.audit.record(AuditEntry::new(AuditEvent::Dispatch {
            proof_type,
            backend,
            success: result.is_ok(),
            vk_hash,
            failure: result.as_ref().err().map(ToString::to_string),
        }));
    }
}
