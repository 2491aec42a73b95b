#![deny(missing_docs)]

//! # uzkv-verifier: Universal ZK Verifier
//!
//! A single entry point for Groth16, PLONK, and STARK proofs. Each call is
//! routed to a [`VerifyBackend`](uzkv_zkp::VerifyBackend) and guarded by the
//! pause gate, the verification-key registry, and the nullifier ledger.
//!
//! ## Dispatch
//!
//! For every verification the [`UniversalVerifier`] runs, under one
//! exclusive lock:
//!
//! 1. Pause gate: [`DispatchError::Paused`] without side effects.
//! 2. Registry: keyed proof types need `(proof_type, vk_hash)` registered.
//! 3. Input limits.
//! 4. Route: the primary backend if it supports the type, else the per-type
//!    fallback, else [`DispatchError::UnsupportedProofType`].
//! 5. Backend call. Failures keep their reason.
//! 6. Nullifier: a public statement with a non-zero nullifier consumes it.
//! 7. Counter, audit entry, tracing event.
//!
//! Batches are evaluated element by element in array order. A batch is a
//! grouping, not a transaction.
//!
//! ## Configuration
//!
//! [`VerifierConfig`] is loaded from defaults, a YAML file, or `UZKV_*`
//! environment variables.

pub mod audit;
pub mod config;
mod dispatch;
pub mod error;
pub mod router;
pub mod verifier;

// Re-export primary types.
pub use audit::{AuditEntry, AuditEvent, AuditLog, AuditTrail};
pub use config::{ConfigError, VerifierConfig};
pub use error::{DispatchError, RejectionReason, VerifierError};
pub use router::{RouteSlot, Router};
pub use verifier::{DispatchReceipt, UniversalVerifier};
