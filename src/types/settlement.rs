//! Settlement record emitted per executed trade.
//!
//! ## Purpose
//!
//! The engine retains no trade history; each `buy`/`sell` hands the caller
//! exactly one settlement record describing what settled. External indexers
//! and history services consume these.
//!
//! ## SSZ Serialization
//!
//! Settlements derive `SimpleSerialize` for a deterministic wire encoding:
//! identical trades always serialize to identical bytes.

use ssz_rs::prelude::*;

use crate::types::side::{Side, TradeDirection};

/// Record of one settled trade against a market.
///
/// Enum fields are stored as u8 raw values for the fixed-size SSZ container;
/// the typed accessors recover them.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Settlement {
    /// Subject whose market settled the trade
    pub subject_id: u64,

    /// Traded side as u8 (0=Trust, 1=Distrust)
    pub side_raw: u8,

    /// Trade direction as u8 (0=Buy, 1=Sell)
    pub direction_raw: u8,

    /// Vote units traded
    pub units: u64,

    /// Gross funds moved at the curve, in fixed-point. Excludes fees and
    /// donation: this is what `funds_held` changed by.
    pub gross_funds: u64,

    /// Marginal price of the traded side after the trade, in fixed-point
    pub new_price: u64,

    /// Host-supplied timestamp in milliseconds
    pub timestamp: u64,
}

impl Settlement {
    /// Build a settlement record.
    pub fn new(
        subject_id: u64,
        side: Side,
        direction: TradeDirection,
        units: u64,
        gross_funds: u64,
        new_price: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            subject_id,
            side_raw: side.to_u8(),
            direction_raw: direction.to_u8(),
            units,
            gross_funds,
            new_price,
            timestamp,
        }
    }

    /// The traded side.
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Trust)
    }

    /// The trade direction.
    pub fn direction(&self) -> TradeDirection {
        TradeDirection::from_u8(self.direction_raw).unwrap_or(TradeDirection::Buy)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
