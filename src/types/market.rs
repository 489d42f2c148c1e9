//! Per-subject market state.
//!
//! ## SSZ Serialization
//!
//! `Market` derives `SimpleSerialize` so the store can hash a deterministic
//! encoding of the full market set into a state root. All fields are u64 for
//! a fixed-size container.
//!
//! ## Seeding
//!
//! A market is created with exactly one vote on each side. The seed votes
//! are never sellable, which keeps the curve away from the zero-supply
//! singularity and makes `votes >= 1` a permanent invariant per side.

use ssz_rs::prelude::*;

use crate::types::config::ConfigId;
use crate::types::side::Side;

/// Subject identity a market is keyed by.
pub type SubjectId = u64;

/// Upper bound on outstanding votes per side.
///
/// Keeps the signed imbalance comfortably inside i64. Trades that would
/// cross it fail with `MathOverflow`, as do configs whose `base_price * k`
/// pushes the cost potential itself out of numeric range.
pub const MAX_VOTES_PER_SIDE: u64 = 1 << 52;

/// One reputation market: outstanding votes on both sides, the config it was
/// created under, and the funds backing its positions.
///
/// ## Invariants
///
/// - `trust_votes >= 1` and `distrust_votes >= 1` (seed units)
/// - `funds_held` equals all buy costs minus all sell proceeds since
///   creation (fees and donations are charged outside of `funds_held`)
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Market {
    /// Subject identity this market trades against
    pub subject_id: u64,

    /// Id of the immutable config fixed at creation
    pub config_id: u64,

    /// Outstanding trust votes (including the seed unit)
    pub trust_votes: u64,

    /// Outstanding distrust votes (including the seed unit)
    pub distrust_votes: u64,

    /// Accumulated funds backing this market's positions, in fixed-point.
    /// Net of fees and donations, which are routed out separately.
    pub funds_held: u64,
}

impl Market {
    /// Create a market seeded with one vote per side and no funds.
    pub fn new(subject_id: SubjectId, config_id: ConfigId) -> Self {
        Self {
            subject_id,
            config_id,
            trust_votes: 1,
            distrust_votes: 1,
            funds_held: 0,
        }
    }

    /// Outstanding votes on one side.
    pub fn votes(&self, side: Side) -> u64 {
        match side {
            Side::Trust => self.trust_votes,
            Side::Distrust => self.distrust_votes,
        }
    }

    /// Signed imbalance from one side's perspective: own votes minus the
    /// opposing side's votes. Positive means the side dominates.
    ///
    /// Counts are bounded by [`MAX_VOTES_PER_SIDE`], so the difference
    /// always fits in i64.
    pub fn imbalance(&self, side: Side) -> i64 {
        let (own, other) = match side {
            Side::Trust => (self.trust_votes, self.distrust_votes),
            Side::Distrust => (self.distrust_votes, self.trust_votes),
        };
        own as i64 - other as i64
    }

    /// Add bought votes to one side. Returns `None` past
    /// [`MAX_VOTES_PER_SIDE`].
    pub fn add_votes(&mut self, side: Side, units: u64) -> Option<()> {
        let slot = match side {
            Side::Trust => &mut self.trust_votes,
            Side::Distrust => &mut self.distrust_votes,
        };
        let next = slot.checked_add(units)?;
        if next > MAX_VOTES_PER_SIDE {
            return None;
        }
        *slot = next;
        Some(())
    }

    /// Remove sold votes from one side. Returns `None` if the removal would
    /// consume the seed unit (`votes - units < 1`).
    pub fn remove_votes(&mut self, side: Side, units: u64) -> Option<()> {
        let slot = match side {
            Side::Trust => &mut self.trust_votes,
            Side::Distrust => &mut self.distrust_votes,
        };
        let next = slot.checked_sub(units)?;
        if next < 1 {
            return None;
        }
        *slot = next;
        Some(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
