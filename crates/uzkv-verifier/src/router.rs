//! # Backend Routing
//!
//! One optional primary backend (typically the external engine) plus at
//! most one fallback per proof type. Selection prefers the primary when it
//! supports the proof type.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uzkv_core::ProofType;
use uzkv_zkp::{BackendIdentity, VerifyBackend};

/// A route a backend can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "slot", content = "proof_type", rename_all = "snake_case")]
pub enum RouteSlot {
    /// Primary engine, tried first for every proof type.
    Primary,
    /// Fallback module for one proof type.
    Fallback(ProofType),
}

impl std::fmt::Display for RouteSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Fallback(t) => write!(f, "fallback:{t}"),
        }
    }
}

/// Backend routing table.
#[derive(Default)]
pub struct Router {
    primary: Option<Arc<dyn VerifyBackend>>,
    fallbacks: BTreeMap<ProofType, Arc<dyn VerifyBackend>>,
}

impl Router {
    /// An empty table. Every proof type is unsupported until a backend is
    /// configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// The backend that will handle `proof_type`, if any.
    pub fn select(&self, proof_type: ProofType) -> Option<(RouteSlot, Arc<dyn VerifyBackend>)> {
        if let Some(primary) = &self.primary {
            if primary.supports(proof_type) {
                return Some((RouteSlot::Primary, Arc::clone(primary)));
            }
        }
        self.fallbacks
            .get(&proof_type)
            .map(|b| (RouteSlot::Fallback(proof_type), Arc::clone(b)))
    }

    /// Put `backend` in `slot`, returning the previous occupant.
    pub fn set(
        &mut self,
        slot: RouteSlot,
        backend: Arc<dyn VerifyBackend>,
    ) -> Option<Arc<dyn VerifyBackend>> {
        match slot {
            RouteSlot::Primary => self.primary.replace(backend),
            RouteSlot::Fallback(t) => self.fallbacks.insert(t, backend),
        }
    }

    /// Empty `slot`, returning the previous occupant.
    pub fn clear(&mut self, slot: RouteSlot) -> Option<Arc<dyn VerifyBackend>> {
        match slot {
            RouteSlot::Primary => self.primary.take(),
            RouteSlot::Fallback(t) => self.fallbacks.remove(&t),
        }
    }

    /// Every occupied slot and its backend identity.
    pub fn routes(&self) -> Vec<(RouteSlot, BackendIdentity)> {
        let primary = self
            .primary
            .iter()
            .map(|b| (RouteSlot::Primary, b.identity()));
        let fallbacks = self
            .fallbacks
            .iter()
            .map(|(t, b)| (RouteSlot::Fallback(*t), b.identity()));
        primary.chain(fallbacks).collect()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes())
            .finish()
    }
}
