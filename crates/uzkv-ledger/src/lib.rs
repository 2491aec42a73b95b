#![deny(missing_docs)]

//! # uzkv-ledger: Authoritative Verifier State
//!
//! One [`LedgerState`] value owns the verification-key registry, the
//! nullifier ledger, the operational (pause) state, and the counters. It has
//! no interior locking: the owner serializes access, so every method runs
//! against a consistent snapshot and every mutation is all-or-nothing.
//!
//! ## Access Control
//!
//! Administrative rights are unforgeable capability tokens minted once per
//! ledger by [`LedgerState::new`]:
//!
//! - [`PauseCapability`] engages the pause gate.
//! - [`UnpauseCapability`] releases it.
//! - [`ModuleManagerCapability`] mutates the registry and backend routes.
//!
//! Tokens are not `Clone`. Handing a right to someone else means moving the
//! token. A token minted for a different ledger is rejected.
//!
//! ## Fail-Closed
//!
//! While paused, every mutating operation fails with [`AccessError::Paused`]
//! before any capability check. Reads stay available.

pub mod capability;
pub mod error;
pub mod nullifier;
pub mod operational;
pub mod registry;
pub mod state;

// Re-export primary types at crate root for ergonomic imports.
pub use capability::{
    Capabilities, Capability, CapabilityKind, ModuleManagerCapability, PauseCapability,
    UnpauseCapability,
};
pub use error::{AccessError, LedgerError, RegistryError, ReplayError};
pub use nullifier::NullifierLedger;
pub use operational::OperationalState;
pub use registry::{Registration, RegistrationOutcome, VkRecord, VkRegistry};
pub use state::{LedgerState, LedgerStats};
