//! # Verifier Audit Trail
//!
//! Records every dispatch outcome, registry mutation, pause-gate transition,
//! and backend reconfiguration.
//!
//! ## Security Invariant
//!
//! Every entry is individually digestable: SHA-256 over its JSON form. The
//! [`AuditTrail`] is append-only and trims the oldest 10% when it exceeds its
//! configured capacity. Deployments that need the full history implement
//! [`AuditLog`] over durable storage instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uzkv_core::{ProofType, VkHash};
use uzkv_ledger::OperationalState;
use uzkv_zkp::BackendIdentity;

use crate::router::RouteSlot;

// ---------------------------------------------------------------------------
// AuditEvent
// ---------------------------------------------------------------------------

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A verification call finished, successfully or not.
    Dispatch {
        /// Proof system.
        proof_type: ProofType,
        /// Backend that handled the call. `None` if rejected before routing.
        backend: Option<BackendIdentity>,
        /// Whether the proof was accepted and recorded.
        success: bool,
        /// Key hash the call referenced.
        vk_hash: VkHash,
        /// Failure description when `success` is false.
        failure: Option<String>,
    },

    /// A verification key was registered or removed.
    Registry {
        /// Proof system namespace.
        proof_type: ProofType,
        /// Affected key.
        vk_hash: VkHash,
        /// Whether the key was registered before the call.
        previous: bool,
        /// Whether it is registered after.
        new: bool,
    },

    /// The pause gate changed state (or was set to the state it had).
    Operational {
        /// State before the call.
        previous: OperationalState,
        /// State after.
        new: OperationalState,
    },

    /// A backend route was set or cleared.
    BackendConfigured {
        /// Which route.
        slot: RouteSlot,
        /// Backend previously in the slot.
        previous: Option<BackendIdentity>,
        /// Backend now in the slot.
        new: Option<BackendIdentity>,
    },
}

impl AuditEvent {
    /// Short name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Dispatch { .. } => "dispatch",
            Self::Registry { .. } => "registry",
            Self::Operational { .. } => "operational",
            Self::BackendConfigured { .. } => "backend_configured",
        }
    }
}

// ---------------------------------------------------------------------------
// AuditEntry
// ---------------------------------------------------------------------------

/// An event with its UTC timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The event.
    #[serde(flatten)]
    pub event: AuditEvent,
    /// When it was recorded.
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Stamp `event` with the current time.
    pub fn new(event: AuditEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }

    /// Lowercase hex SHA-256 of the entry's JSON form.
    ///
    /// Returns `None` if serialization fails.
    pub fn digest(&self) -> Option<String> {
        match serde_json::to_vec(self) {
            Ok(bytes) => Some(hex::encode(Sha256::digest(&bytes))),
            Err(e) => {
                tracing::warn!(kind = self.event.kind(), error = %e, "audit entry serialization failed; digest unavailable");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// AuditLog
// ---------------------------------------------------------------------------

/// Append-only sink for audit entries.
///
/// The verifier calls [`record`](Self::record) while holding its lock, so
/// implementations must not block for long and must not call back into the
/// verifier.
pub trait AuditLog: Send {
    /// Append one entry.
    fn record(&mut self, entry: AuditEntry);
}

// ---------------------------------------------------------------------------
// AuditTrail
// ---------------------------------------------------------------------------

/// In-memory [`AuditLog`] with a bounded capacity.
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
    max_entries: usize,
}

impl AuditTrail {
    /// Create a trail holding at most about `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Append an entry, trimming the oldest 10% when over capacity.
    pub fn append(&mut self, entry: AuditEntry) {
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            let trim_count = (self.max_entries / 10).max(1).min(self.entries.len());
            self.entries.drain(..trim_count);
        }
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&AuditEntry> {
        self.entries.last()
    }

    /// Entries whose event kind is `kind` (see [`AuditEvent::kind`]).
    pub fn entries_by_kind(&self, kind: &str) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.event.kind() == kind)
            .collect()
    }

    /// `(index, digest)` for every entry that serializes.
    pub fn compute_digests(&self) -> Vec<(usize, String)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.digest().map(|d| (i, d)))
            .collect()
    }
}

impl AuditLog for AuditTrail {
    fn record(&mut self, entry: AuditEntry) {
        self.append(entry);
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl std::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditTrail")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uzkv_zkp::BackendKind;

    fn dispatch(success: bool) -> AuditEvent {
        AuditEvent::Dispatch {
            proof_type: ProofType::Groth16,
            backend: Some(BackendIdentity::new("mock-sha256", BackendKind::Mock)),
            success,
            vk_hash: VkHash::of(b"vk"),
            failure: (!success).then(|| "invalid proof".to_string()),
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn digest_is_hex_sha256() {
        let d = AuditEntry::new(dispatch(true)).digest().unwrap();
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_deterministic() {
        let entry = AuditEntry {
            event: dispatch(false),
            timestamp: fixed_time(),
        };
        assert_eq!(entry.digest(), entry.clone().digest());
    }

    #[test]
    fn digest_distinguishes_outcome() {
        let ok = AuditEntry {
            event: dispatch(true),
            timestamp: fixed_time(),
        };
        let failed = AuditEntry {
            event: dispatch(false),
            timestamp: fixed_time(),
        };
        assert_ne!(ok.digest(), failed.digest());
    }

    #[test]
    fn json_is_flat_and_tagged() {
        let entry = AuditEntry {
            event: AuditEvent::Operational {
                previous: OperationalState::Active,
                new: OperationalState::Paused,
            },
            timestamp: fixed_time(),
        };
        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(v["event"], "operational");
        assert_eq!(v["previous"], "active");
        assert_eq!(v["new"], "paused");
        let back: AuditEntry = serde_json::from_value(v).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn append_and_query() {
        let mut trail = AuditTrail::new(100);
        trail.record(AuditEntry::new(dispatch(true)));
        trail.record(AuditEntry::new(AuditEvent::Registry {
            proof_type: ProofType::Plonk,
            vk_hash: VkHash::of(b"k"),
            previous: false,
            new: true,
        }));
        trail.record(AuditEntry::new(dispatch(false)));
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.entries_by_kind("dispatch").len(), 2);
        assert_eq!(trail.entries_by_kind("registry").len(), 1);
        assert_eq!(trail.last().unwrap().event, dispatch(false));
    }

    #[test]
    fn trimming_keeps_capacity() {
        let mut trail = AuditTrail::new(10);
        for _ in 0..25 {
            trail.append(AuditEntry::new(dispatch(true)));
        }
        assert!(trail.len() <= 10);
    }

    #[test]
    fn zero_capacity_never_panics() {
        let mut trail = AuditTrail::new(0);
        trail.append(AuditEntry::new(dispatch(true)));
        trail.append(AuditEntry::new(dispatch(true)));
        assert!(trail.is_empty());
    }

    #[test]
    fn compute_digests_covers_all() {
        let mut trail = AuditTrail::default();
        trail.append(AuditEntry::new(dispatch(true)));
        trail.append(AuditEntry::new(dispatch(false)));
        let digests = trail.compute_digests();
        assert_eq!(digests.len(), 2);
        assert_ne!(digests[0].1, digests[1].1);
    }

    #[test]
    fn debug_shows_counts_only() {
        let trail = AuditTrail::new(5);
        assert_eq!(
            format!("{trail:?}"),
            "AuditTrail { entries: 0, max_entries: 5 }"
        );
    }
}
