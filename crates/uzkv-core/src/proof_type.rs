//! # Proof Types
//!
//! The closed set of proof systems the verifier routes. The one-byte tag is
//! part of the envelope wire format and must never be renumbered.
//!
//! | Tag | System  | Setup                      | Verification key |
//! |-----|---------|----------------------------|------------------|
//! | 0   | Groth16 | trusted, circuit-specific  | required         |
//! | 1   | PLONK   | trusted, universal         | required         |
//! | 2   | STARK   | transparent                | none             |
//!
//! Each system also declares a [`SecurityModel`]: Groth16 and PLONK rest on
//! pairings over BN254 (128-bit, not post-quantum), STARK on hash-based FRI
//! (128-bit, post-quantum).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, UnknownProofType};

/// A supported proof system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ProofType {
    /// Groth16 pairing-based SNARK.
    Groth16 = 0,
    /// PLONK with a universal setup.
    Plonk = 1,
    /// Transparent STARK. Carries no trusted verification key.
    Stark = 2,
}

/// How a proof system's parameters were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupType {
    /// Per-circuit trusted setup ceremony.
    TrustedCircuitSpecific,
    /// One trusted ceremony shared by all circuits up to a size bound.
    TrustedUniversal,
    /// No trusted setup; verification needs only public parameters.
    Transparent,
}

/// Hardness assumption a proof system's soundness rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CryptoAssumption {
    /// Discrete log / pairing assumptions over an elliptic curve.
    Pairing,
    /// Collision resistance of a hash function only.
    HashBased,
}

impl CryptoAssumption {
    /// Whether the assumption survives a quantum adversary.
    pub fn is_post_quantum(self) -> bool {
        matches!(self, Self::HashBased)
    }
}

/// Declared security properties of a proof system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurityModel {
    /// Setup ceremony the system needs.
    pub setup_type: SetupType,
    /// Underlying assumption.
    pub crypto_assumption: CryptoAssumption,
    /// Conjectured security level in bits.
    pub security_bits: u16,
}

impl SecurityModel {
    /// Groth16 over BN254.
    pub const GROTH16_BN254: Self = Self {
        setup_type: SetupType::TrustedCircuitSpecific,
        crypto_assumption: CryptoAssumption::Pairing,
        security_bits: 128,
    };

    /// PLONK with KZG commitments over BN254.
    pub const PLONK_KZG_BN254: Self = Self {
        setup_type: SetupType::TrustedUniversal,
        crypto_assumption: CryptoAssumption::Pairing,
        security_bits: 128,
    };

    /// FRI-based STARK.
    pub const STARK_FRI: Self = Self {
        setup_type: SetupType::Transparent,
        crypto_assumption: CryptoAssumption::HashBased,
        security_bits: 128,
    };

    /// Whether proofs stay sound against a quantum adversary.
    pub fn post_quantum_secure(&self) -> bool {
        self.crypto_assumption.is_post_quantum()
    }
}

impl ProofType {
    /// All proof types in tag order.
    pub const ALL: [ProofType; 3] = [ProofType::Groth16, ProofType::Plonk, ProofType::Stark];

    /// Decode a wire tag.
    pub fn from_u8(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(Self::Groth16),
            1 => Ok(Self::Plonk),
            2 => Ok(Self::Stark),
            other => Err(CodecError::InvalidProofType(other)),
        }
    }

    /// The wire tag.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Return the string value for serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groth16 => "groth16",
            Self::Plonk => "plonk",
            Self::Stark => "stark",
        }
    }

    /// Declared security properties of this proof system.
    pub fn security_model(self) -> SecurityModel {
        match self {
            Self::Groth16 => SecurityModel::GROTH16_BN254,
            Self::Plonk => SecurityModel::PLONK_KZG_BN254,
            Self::Stark => SecurityModel::STARK_FRI,
        }
    }

    /// The setup model of this proof system.
    pub fn setup_type(self) -> SetupType {
        self.security_model().setup_type
    }

    /// Whether proofs of this type are checked against a registered
    /// verification key. Transparent systems skip the registry entirely.
    pub fn uses_verification_key(self) -> bool {
        self.setup_type() != SetupType::Transparent
    }
}

impl TryFrom<u8> for ProofType {
    type Error = CodecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::from_u8(tag)
    }
}

impl From<ProofType> for u8 {
    fn from(t: ProofType) -> u8 {
        t.to_u8()
    }
}

impl FromStr for ProofType {
    type Err = UnknownProofType;

    /// Accepts the lowercase name, any casing of it, or the numeric tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groth16" | "0" => Ok(Self::Groth16),
            "plonk" | "1" => Ok(Self::Plonk),
            "stark" | "2" => Ok(Self::Stark),
            _ => Err(UnknownProofType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
