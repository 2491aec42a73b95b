//! # Nullifier Ledger
//!
//! A set of consumed nullifiers. First writer wins; every later mark of the
//! same value fails with [`ReplayError::NullifierReplay`], permanently.
//!
//! [`mark_used`](NullifierLedger::mark_used) is a single `HashSet::insert`,
//! so check and set cannot be separated. Concurrent callers are serialized
//! by whoever owns the ledger.

use std::collections::HashSet;

use uzkv_core::Nullifier;

use crate::error::ReplayError;

/// Consumed nullifiers.
#[derive(Debug, Default)]
pub struct NullifierLedger {
    used: HashSet<Nullifier>,
}

impl NullifierLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume `nullifier`.
    pub fn mark_used(&mut self, nullifier: Nullifier) -> Result<(), ReplayError> {
        if self.used.insert(nullifier) {
            Ok(())
        } else {
            Err(ReplayError::NullifierReplay { nullifier })
        }
    }

    /// Whether `nullifier` has been consumed.
    pub fn is_used(&self, nullifier: &Nullifier) -> bool {
        self.used.contains(nullifier)
    }

    /// Number of consumed nullifiers.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Whether nothing has been consumed.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(b: u8) -> Nullifier {
        Nullifier::from_bytes([b; 32])
    }

    #[test]
    fn first_mark_succeeds_second_replays() {
        let mut ledger = NullifierLedger::new();
        assert!(!ledger.is_used(&n(1)));
        ledger.mark_used(n(1)).unwrap();
        assert!(ledger.is_used(&n(1)));
        assert_eq!(
            ledger.mark_used(n(1)),
            Err(ReplayError::NullifierReplay { nullifier: n(1) })
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn distinct_nullifiers_independent() {
        let mut ledger = NullifierLedger::new();
        ledger.mark_used(n(1)).unwrap();
        ledger.mark_used(n(2)).unwrap();
        assert!(!ledger.is_used(&n(3)));
        assert_eq!(ledger.len(), 2);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn replay_is_permanent(raw in any::<[u8; 32]>(), retries in 1usize..8) {
                let nullifier = Nullifier::from_bytes(raw);
                let mut ledger = NullifierLedger::new();
                prop_assert!(ledger.mark_used(nullifier).is_ok());
                for _ in 0..retries {
                    let replay = matches!(
                        ledger.mark_used(nullifier),
                        Err(ReplayError::NullifierReplay { .. })
                    );
                    prop_assert!(replay);
                    prop_assert!(ledger.is_used(&nullifier));
                }
            }
        }
    }
}
