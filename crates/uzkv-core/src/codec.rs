//! # Bounded Byte Reader
//!
//! Shared primitives for the envelope and statement codecs.
//!
//! ## Security Invariant
//!
//! [`ByteReader`] checks every read against the remaining buffer with
//! checked arithmetic before slicing. A declared length larger than what is
//! left yields [`CodecError::TruncatedBuffer`]; nothing is copied or
//! allocated on that path.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Whether bytes after the end of a record are an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Reject trailing bytes with [`CodecError::TrailingBytes`].
    #[default]
    Strict,
    /// Ignore trailing bytes.
    Lenient,
}

impl DecodeMode {
    /// Return the string value for serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl std::str::FromStr for DecodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("unknown decode mode {other:?}")),
        }
    }
}

impl std::fmt::Display for DecodeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cursor over an untrusted byte slice.
pub(crate) struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub(crate) fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        let truncated = CodecError::TruncatedBuffer {
            field,
            needed: n,
            remaining,
        };
        let end = self.pos.checked_add(n).ok_or_else(|| truncated.clone())?;
        let slice = self.buf.get(self.pos..end).ok_or(truncated)?;
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self, field: &'static str) -> Result<u8, CodecError> {
        Ok(self.take(1, field)?[0])
    }

    pub(crate) fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    pub(crate) fn u32_be(&mut self, field: &'static str) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.array(field)?))
    }

    pub(crate) fn u128_be(&mut self, field: &'static str) -> Result<u128, CodecError> {
        Ok(u128::from_be_bytes(self.array(field)?))
    }

    /// Read a `u32` big-endian length followed by that many bytes.
    pub(crate) fn length_prefixed(
        &mut self,
        len_field: &'static str,
        field: &'static str,
    ) -> Result<&'a [u8], CodecError> {
        let len = self.u32_be(len_field)?;
        let len = usize::try_from(len).map_err(|_| CodecError::TruncatedBuffer {
            field,
            needed: usize::MAX,
            remaining: self.remaining(),
        })?;
        self.take(len, field)
    }

    /// Apply the trailing-bytes rule for `mode`.
    pub(crate) fn finish(self, mode: DecodeMode) -> Result<(), CodecError> {
        match (mode, self.remaining()) {
            (DecodeMode::Strict, n) if n > 0 => Err(CodecError::TrailingBytes(n)),
            _ => Ok(()),
        }
    }
}

/// Reject a variable-length field that cannot be length-prefixed.
pub(crate) fn check_prefixable(field: &'static str, bytes: &[u8]) -> Result<(), CodecError> {
    if u32::try_from(bytes.len()).is_err() {
        return Err(CodecError::FieldTooLong {
            field,
            len: bytes.len(),
        });
    }
    Ok(())
}

/// Append a `u32` big-endian length and the bytes. Callers validate the
/// length with [`check_prefixable`] at construction time.
pub(crate) fn put_length_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(bytes);
}
