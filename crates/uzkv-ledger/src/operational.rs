//! Pause-gate state.

use serde::{Deserialize, Serialize};

/// Whether the verifier admits verification and mutating calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalState {
    /// Normal operation.
    #[default]
    Active,
    /// Emergency stop. Only reads succeed.
    Paused,
}

impl OperationalState {
    /// Return the string value for serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }

    /// Whether this is [`OperationalState::Paused`].
    pub fn is_paused(self) -> bool {
        self == Self::Paused
    }
}

impl std::fmt::Display for OperationalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
