//! Verifier configuration.
//!
//! Loaded from defaults, a YAML file, or environment variables:
//!
//! - `UZKV_PROOF_POLICY` (`production` | `development`)
//! - `UZKV_DECODE_MODE` (`strict` | `lenient`, default `strict`)
//! - `UZKV_MAX_BATCH_SIZE` (default 256)
//! - `UZKV_AUDIT_CAPACITY` (default 10000)
//! - `UZKV_MIN_SECURITY_BITS` (default 128)
//! - `UZKV_REQUIRE_POST_QUANTUM` (`true` | `false`, default `false`)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uzkv_core::DecodeMode;
use uzkv_zkp::{InputLimits, PolicyMode, SecurityRequirement};

/// Runtime settings for a [`UniversalVerifier`](crate::UniversalVerifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Which backend kinds may be configured.
    pub policy: PolicyMode,
    /// Trailing-bytes rule for envelope decoding.
    pub decode_mode: DecodeMode,
    /// Per-proof-type size bounds.
    pub limits: InputLimits,
    /// Minimum security a proof type must declare to be dispatched.
    pub security: SecurityRequirement,
    /// Largest accepted batch.
    pub max_batch_size: usize,
    /// Audit trail capacity before trimming.
    pub audit_capacity: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            policy: PolicyMode::default(),
            decode_mode: DecodeMode::Strict,
            limits: InputLimits::default(),
            security: SecurityRequirement::default(),
            max_batch_size: 256,
            audit_capacity: 10_000,
        }
    }
}

impl VerifierConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Parse YAML. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Apply `UZKV_*` environment variables on top of `self`.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(raw) = env_var("UZKV_PROOF_POLICY") {
            self.policy = PolicyMode::parse(&raw).ok_or_else(|| invalid("UZKV_PROOF_POLICY", &raw))?;
        }
        if let Some(raw) = env_var("UZKV_DECODE_MODE") {
            self.decode_mode = raw.parse().map_err(|_| invalid("UZKV_DECODE_MODE", &raw))?;
        }
        if let Some(raw) = env_var("UZKV_MAX_BATCH_SIZE") {
            self.max_batch_size = raw
                .trim()
                .parse()
                .map_err(|_| invalid("UZKV_MAX_BATCH_SIZE", &raw))?;
        }
        if let Some(raw) = env_var("UZKV_AUDIT_CAPACITY") {
            self.audit_capacity = raw
                .trim()
                .parse()
                .map_err(|_| invalid("UZKV_AUDIT_CAPACITY", &raw))?;
        }
        if let Some(raw) = env_var("UZKV_MIN_SECURITY_BITS") {
            self.security.min_security_bits = raw
                .trim()
                .parse()
                .map_err(|_| invalid("UZKV_MIN_SECURITY_BITS", &raw))?;
        }
        if let Some(raw) = env_var("UZKV_REQUIRE_POST_QUANTUM") {
            self.security.require_post_quantum = raw
                .trim()
                .to_ascii_lowercase()
                .parse()
                .map_err(|_| invalid("UZKV_REQUIRE_POST_QUANTUM", &raw))?;
        }
        Ok(self)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn invalid(var: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidVar {
        var,
        value: value.to_string(),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The YAML is malformed or has wrongly typed fields.
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An environment variable has an unparseable value.
    #[error("invalid value for {var}: {value:?}")]
    InvalidVar {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}
