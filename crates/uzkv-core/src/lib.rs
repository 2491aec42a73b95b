#![deny(missing_docs)]

//! # uzkv-core: Foundational Types for the Universal ZK Verifier
//!
//! Every other crate in the workspace builds on the types defined here. The
//! crate is pure: no I/O, no shared state, no locking. Codec functions may be
//! called concurrently from any number of threads.
//!
//! ## Contents
//!
//! - [`ProofType`]: the closed set of supported proof systems, their
//!   one-byte wire tags, and the [`SecurityModel`] each one declares.
//! - [`VkHash`] and [`Nullifier`]: 32-byte identifiers. A verification key
//!   is referenced everywhere by its SHA-256 digest.
//! - [`ProofEnvelope`]: the versioned binary container a caller submits.
//! - [`PublicStatement`]: the standardized public-output record a proof may
//!   expose through its public inputs.
//!
//! ## Wire Format
//!
//! All integers are big-endian. Every length prefix is validated against the
//! remaining buffer before any bytes are copied, so decoding never reads out
//! of bounds and never allocates more than the input length.

pub mod codec;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod proof_type;
pub mod statement;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::DecodeMode;
pub use digest::{Nullifier, VkHash};
pub use envelope::{ProofEnvelope, ENVELOPE_HEADER_LEN, ENVELOPE_VERSION};
pub use error::{CodecError, IdentifierError, UnknownProofType};
pub use proof_type::{CryptoAssumption, ProofType, SecurityModel, SetupType};
pub use statement::{PublicStatement, STATEMENT_FIXED_LEN};
