//! # uzkv-zkp: Verification Backends
//!
//! The arithmetic verification engines (pairing checks, polynomial
//! commitment checks, FRI) live outside this workspace. This crate defines
//! the seam they plug into.
//!
//! ## Architecture
//!
//! The [`VerifyBackend`] trait is the only interface the dispatcher uses to
//! reach an engine. A backend reports its [`BackendIdentity`], which proof
//! types it handles, and a verdict or a typed [`BackendError`] per request.
//!
//! [`MockBackend`] is transparent and deterministic: its "proofs" are SHA-256
//! digests with no zero-knowledge properties. [`ProofPolicy`] keeps it out
//! of production deployments, and through its [`SecurityRequirement`] can
//! refuse proof systems below a security level or without post-quantum
//! soundness.
//!
//! [`InputLimits`] bounds proof and public-input sizes per proof type before
//! any backend sees the bytes.

pub mod limits;
pub mod mock;
pub mod policy;
pub mod traits;

// Re-export primary types.
pub use limits::{InputLimits, LimitError};
pub use mock::MockBackend;
pub use policy::{
    PolicyError, PolicyMode, ProofPolicy, SecurityError, SecurityRequirement,
};
pub use traits::{BackendError, BackendIdentity, BackendKind, VerifyBackend, VerifyRequest};
