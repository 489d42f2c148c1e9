//! The two complementary position types of a reputation market.
//!
//! Every market carries exactly two sides, trust and distrust. Prices of the
//! two sides always sum to the configured base price, so one side's raw
//! imbalance fully determines both prices.

/// Position side: Trust or Distrust
///
/// Represented as u8 where raw storage needs it (SSZ containers):
/// - Trust = 0
/// - Distrust = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Trust position - a bet that the subject's reputation holds up
    #[default]
    Trust,
    /// Distrust position - the complementary bet
    Distrust,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Trust => 0,
            Side::Distrust => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Trust),
            1 => Some(Side::Distrust),
            _ => None,
        }
    }

    /// Returns the opposing side
    pub fn opposite(self) -> Self {
        match self {
            Side::Trust => Side::Distrust,
            Side::Distrust => Side::Trust,
        }
    }
}

/// Direction of a settled trade.
///
/// Stored as u8 in settlement records:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TradeDirection {
    /// Units were bought into the market
    #[default]
    Buy,
    /// Units were sold back to the market
    Sell,
}

impl TradeDirection {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            TradeDirection::Buy => 0,
            TradeDirection::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TradeDirection::Buy),
            1 => Some(TradeDirection::Sell),
            _ => None,
        }
    }
}
