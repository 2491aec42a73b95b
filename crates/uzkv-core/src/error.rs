//! # Codec and Identifier Errors
//!
//! Decoding never panics. Every malformed buffer maps to exactly one
//! [`CodecError`] variant that names the field being read, so callers can
//! tell a truncated upload from a version mismatch.

use thiserror::Error;

/// Errors produced while constructing, encoding, or decoding a wire record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The envelope declares a format version this build does not understand.
    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u8),

    /// A fixed-width field or a declared length exceeds the bytes remaining.
    #[error("truncated buffer reading {field}: needed {needed} bytes, {remaining} remaining")]
    TruncatedBuffer {
        /// The field being read when the buffer ran out.
        field: &'static str,
        /// Number of bytes the field requires.
        needed: usize,
        /// Number of bytes left in the buffer.
        remaining: usize,
    },

    /// Strict decoding found bytes after the end of the record.
    #[error("{0} trailing bytes after end of record")]
    TrailingBytes(usize),

    /// The proof-type tag is outside the known range.
    #[error("invalid proof type tag {0}")]
    InvalidProofType(u8),

    /// A variable-length field cannot be described by a `u32` length prefix.
    #[error("{field} is {len} bytes, which exceeds the u32 length prefix")]
    FieldTooLong {
        /// The oversized field.
        field: &'static str,
        /// Its actual length.
        len: usize,
    },
}

/// Errors parsing a 32-byte identifier from its hex form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdentifierError {
    /// The input is not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The input decoded to the wrong number of bytes.
    #[error("expected 32 bytes, got {0}")]
    WrongLength(usize),
}

/// A proof-type name that does not match any supported proof system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown proof type {0:?} (expected groth16, plonk or stark)")]
pub struct UnknownProofType(pub String);
