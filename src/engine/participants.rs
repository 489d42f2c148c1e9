//! Participant Registry: who has ever traded in a market.
//!
//! Membership is monotonic. A holder who sells out completely stays a
//! participant; the registry records "has ever traded here", not "currently
//! holds". Enumeration order is insertion order and is never reordered or
//! compacted, so external indexers can page deterministically.

use std::collections::{HashMap, HashSet};

use crate::ledger::custody::AccountId;
use crate::types::SubjectId;

/// Append-only participant set for one market.
///
/// The `Vec` preserves insertion order for stable enumeration; the `HashSet`
/// gives the O(1) membership test.
#[derive(Debug, Default)]
struct ParticipantSet {
    ordered: Vec<AccountId>,
    members: HashSet<AccountId>,
}

impl ParticipantSet {
    /// Add a holder if absent. Idempotent.
    fn record(&mut self, holder: AccountId) {
        if self.members.insert(holder) {
            self.ordered.push(holder);
        }
    }
}

/// Per-market participant sets.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    per_market: HashMap<SubjectId, ParticipantSet>,
}

impl ParticipantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `holder` traded in `subject`'s market. No-op if already
    /// recorded.
    pub fn record(&mut self, subject: SubjectId, holder: AccountId) {
        self.per_market.entry(subject).or_default().record(holder);
    }

    /// O(1) membership test.
    pub fn is_participant(&self, subject: SubjectId, holder: AccountId) -> bool {
        self.per_market
            .get(&subject)
            .map(|set| set.members.contains(&holder))
            .unwrap_or(false)
    }

    /// Number of distinct holders that ever traded in the market.
    pub fn count(&self, subject: SubjectId) -> usize {
        self.per_market
            .get(&subject)
            .map(|set| set.ordered.len())
            .unwrap_or(0)
    }

    /// All participants in stable insertion order.
    pub fn participants(&self, subject: SubjectId) -> &[AccountId] {
        self.per_market
            .get(&subject)
            .map(|set| set.ordered.as_slice())
            .unwrap_or(&[])
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_idempotent() {
        let mut registry = ParticipantRegistry::new();
        registry.record(7, 100);
        registry.record(7, 100);
        registry.record(7, 100);

        assert_eq!(registry.count(7), 1);
        assert!(registry.is_participant(7, 100));
    }

    #[test]
    fn test_enumeration_is_insertion_ordered() {
        let mut registry = ParticipantRegistry::new();
        registry.record(7, 300);
        registry.record(7, 100);
        registry.record(7, 200);
        registry.record(7, 100); // repeat does not reorder

        assert_eq!(registry.participants(7), &[300, 100, 200]);
    }

    #[test]
    fn test_markets_are_independent() {
        let mut registry = ParticipantRegistry::new();
        registry.record(7, 100);
        registry.record(8, 200);

        assert!(registry.is_participant(7, 100));
        assert!(!registry.is_participant(8, 100));
        assert_eq!(registry.count(8), 1);
    }

    #[test]
    fn test_unknown_market_is_empty() {
        let registry = ParticipantRegistry::new();
        assert_eq!(registry.count(99), 0);
        assert!(registry.participants(99).is_empty());
        assert!(!registry.is_participant(99, 1));
    }
}
