//! Market Store: durable per-subject state.
//!
//! ## Architecture
//!
//! A hybrid structure:
//!
//! - **Slab**: pre-allocated market storage; markets are never deleted, so
//!   slab keys are stable for the life of the engine
//! - **HashMap**: subject id to slab key for O(1) lookup
//!
//! ## State Root
//!
//! The store can hash its full market set into a 32-byte SHA-256 root over
//! the SSZ encodings, in creation order. Identical trade histories produce
//! identical roots, which is how the determinism tests compare runs.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use slab::Slab;

use crate::errors::MarketError;
use crate::types::{Market, SubjectId};

/// Keyed store of all markets, one per subject.
#[derive(Debug, Default)]
pub struct MarketStore {
    /// Pre-allocated market storage
    markets: Slab<Market>,

    /// Subject id to slab key (O(1) lookup, creation is idempotent-checked)
    subject_index: HashMap<SubjectId, usize>,
}

impl MarketStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with pre-allocated capacity.
    pub fn with_capacity(market_capacity: usize) -> Self {
        Self {
            markets: Slab::with_capacity(market_capacity),
            subject_index: HashMap::with_capacity(market_capacity),
        }
    }

    /// Number of markets.
    #[inline]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether no market exists yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Whether a market exists for the subject.
    #[inline]
    pub fn contains(&self, subject: SubjectId) -> bool {
        self.subject_index.contains_key(&subject)
    }

    /// Insert a newly created market.
    ///
    /// # Errors
    ///
    /// `MarketAlreadyExists` if the subject already has one; creation is
    /// strictly one-shot per subject.
    pub fn insert(&mut self, market: Market) -> Result<usize, MarketError> {
        let subject = market.subject_id;
        if self.contains(subject) {
            return Err(MarketError::MarketAlreadyExists(subject));
        }
        let key = self.markets.insert(market);
        self.subject_index.insert(subject, key);
        Ok(key)
    }

    /// Look up a market by subject.
    pub fn get(&self, subject: SubjectId) -> Option<&Market> {
        let key = *self.subject_index.get(&subject)?;
        self.markets.get(key)
    }

    /// Look up a market mutably by subject.
    pub fn get_mut(&mut self, subject: SubjectId) -> Option<&mut Market> {
        let key = *self.subject_index.get(&subject)?;
        self.markets.get_mut(key)
    }

    /// Iterate all markets in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Market> {
        self.markets.iter().map(|(_, market)| market)
    }

    /// Sum of `funds_held` across all markets, for reconciliation.
    pub fn total_funds_held(&self) -> u64 {
        self.iter().map(|market| market.funds_held).sum()
    }

    // ========================================================================
    // State root
    // ========================================================================

    /// SHA-256 over the SSZ encodings of all markets in creation order.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for market in self.iter() {
            let bytes =
                ssz_rs::serialize(market).expect("fixed-size market container serializes");
            hasher.update(&bytes);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        root
    }

    /// The state root as a hex string.
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    #[test]
    fn test_store_insert_and_get() {
        let mut store = MarketStore::with_capacity(16);
        store.insert(Market::new(7, 1)).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.contains(7));
        assert_eq!(store.get(7).unwrap().subject_id, 7);
        assert!(store.get(8).is_none());
    }

    #[test]
    fn test_store_creation_is_one_shot() {
        let mut store = MarketStore::new();
        store.insert(Market::new(7, 1)).unwrap();

        assert_eq!(
            store.insert(Market::new(7, 2)),
            Err(MarketError::MarketAlreadyExists(7))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_total_funds() {
        let mut store = MarketStore::new();
        store.insert(Market::new(1, 1)).unwrap();
        store.insert(Market::new(2, 1)).unwrap();
        store.get_mut(1).unwrap().funds_held = 100;
        store.get_mut(2).unwrap().funds_held = 250;

        assert_eq!(store.total_funds_held(), 350);
    }

    #[test]
    fn test_state_root_changes_with_state() {
        let mut store = MarketStore::new();
        store.insert(Market::new(1, 1)).unwrap();
        let before = store.state_root();

        store.get_mut(1).unwrap().add_votes(Side::Trust, 5).unwrap();
        let after = store.state_root();

        assert_ne!(before, after);
    }

    #[test]
    fn test_state_root_deterministic() {
        let build = || {
            let mut store = MarketStore::new();
            store.insert(Market::new(1, 1)).unwrap();
            store.insert(Market::new(9, 2)).unwrap();
            store.get_mut(9).unwrap().funds_held = 42;
            store.state_root()
        };

        assert_eq!(build(), build());
    }

    #[test]
    fn test_state_root_hex() {
        let store = MarketStore::new();
        let hex_root = store.state_root_hex();
        assert_eq!(hex_root.len(), 64);
        assert!(hex_root.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
