//! # Capability Tokens
//!
//! Each token carries the id of the ledger that minted it. Fields are
//! private and the types are neither `Clone` nor constructible outside this
//! crate, so holding a token is proof of having been handed it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three administrative rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Engage the pause gate.
    Pause,
    /// Release the pause gate.
    Unpause,
    /// Mutate the key registry and backend routes.
    ModuleManager,
}

impl CapabilityKind {
    /// Return the string value for serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::ModuleManager => "module_manager",
        }
    }
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

mod private {
    pub trait Sealed {}
}

/// Common interface of the token types. Sealed.
pub trait Capability: private::Sealed {
    /// Which right this token grants.
    const KIND: CapabilityKind;

    /// Id of the ledger that minted the token.
    fn ledger_id(&self) -> Uuid;
}

macro_rules! capability_token {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            ledger: Uuid,
        }

        impl $name {
            pub(crate) fn mint(ledger: Uuid) -> Self {
                Self { ledger }
            }
        }

        impl private::Sealed for $name {}

        impl Capability for $name {
            const KIND: CapabilityKind = $kind;

            fn ledger_id(&self) -> Uuid {
                self.ledger
            }
        }
    };
}

capability_token!(
    /// Right to pause the verifier.
    PauseCapability,
    CapabilityKind::Pause
);

capability_token!(
    /// Right to unpause the verifier.
    UnpauseCapability,
    CapabilityKind::Unpause
);

capability_token!(
    /// Right to register and remove verification keys and to configure
    /// backends.
    ModuleManagerCapability,
    CapabilityKind::ModuleManager
);

/// The full set of tokens for one ledger, returned once at construction.
/// Destructure it to hand each right to a different holder.
#[derive(Debug)]
pub struct Capabilities {
    /// Pause right.
    pub pause: PauseCapability,
    /// Unpause right.
    pub unpause: UnpauseCapability,
    /// Registry and routing right.
    pub module_manager: ModuleManagerCapability,
}

impl Capabilities {
    pub(crate) fn mint(ledger: Uuid) -> Self {
        Self {
            pause: PauseCapability::mint(ledger),
            unpause: UnpauseCapability::mint(ledger),
            module_manager: ModuleManagerCapability::mint(ledger),
        }
    }
}
