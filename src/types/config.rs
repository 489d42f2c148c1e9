//! Market and fee configuration.
//!
//! ## Versioning
//!
//! A `MarketConfig` is registered with the engine once and is immutable from
//! then on; each market stores the id of the config it was created under, so
//! later registrations never alter the economics of an existing market.
//!
//! The `FeeConfig` is a single mutable snapshot replaced wholesale through a
//! validated setter. Every trade re-quotes against the snapshot current at
//! call time: changing fees affects the next trade, never a past one.

use crate::errors::MarketError;

/// Identifier of a registered, immutable [`MarketConfig`].
pub type ConfigId = u64;

/// Hard per-field cap on fee basis points (5%).
///
/// Enforced when a [`FeeConfig`] is set, never at trade time.
pub const MAX_FEE_BPS: u16 = 500;

// ============================================================================
// MarketConfig
// ============================================================================

/// Immutable curve parameters referenced by every market created under them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketConfig {
    /// Price ceiling in fixed-point (10^8 scale). The two side prices always
    /// sum to exactly this value.
    pub base_price: u64,

    /// Curve steepness `k`, denominated in vote units. Larger k flattens the
    /// curve: more capital is required to move price by the same amount.
    pub liquidity_parameter: u64,

    /// One-time cost to open a market under this config, in fixed-point.
    /// Routed to the protocol fee recipient at creation.
    pub creation_cost: u64,
}

impl MarketConfig {
    /// Create a config, validating its fields.
    ///
    /// # Errors
    ///
    /// `InvalidMarketConfigOption` if `base_price` is zero or
    /// `liquidity_parameter` is zero (the curve needs k > 0).
    pub fn new(
        base_price: u64,
        liquidity_parameter: u64,
        creation_cost: u64,
    ) -> Result<Self, MarketError> {
        if base_price == 0 || liquidity_parameter == 0 {
            return Err(MarketError::InvalidMarketConfigOption);
        }
        Ok(Self {
            base_price,
            liquidity_parameter,
            creation_cost,
        })
    }
}

// ============================================================================
// FeeConfig
// ============================================================================

/// Fee basis points applied by the Fee & Donation Ledger.
///
/// Entry fee and donation are charged on top of a buy's gross cost; the exit
/// fee is deducted from a sell's gross proceeds. Each field is independently
/// capped by [`MAX_FEE_BPS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeConfig {
    /// Protocol share of a buy, in bps of gross cost (added on top).
    pub entry_fee_bps: u16,

    /// Protocol share of a sell, in bps of gross proceeds (deducted).
    pub exit_fee_bps: u16,

    /// Donation share of a buy, in bps of gross cost (added on top,
    /// escrowed for the subject's donation recipient).
    pub donation_fee_bps: u16,
}

impl FeeConfig {
    /// Create a fee config, validating each field against [`MAX_FEE_BPS`].
    pub fn new(
        entry_fee_bps: u16,
        exit_fee_bps: u16,
        donation_fee_bps: u16,
    ) -> Result<Self, MarketError> {
        let config = Self {
            entry_fee_bps,
            exit_fee_bps,
            donation_fee_bps,
        };
        config.validate()?;
        Ok(config)
    }

    /// A config charging no fees at all.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Check every field against the per-field cap.
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.entry_fee_bps > MAX_FEE_BPS
            || self.exit_fee_bps > MAX_FEE_BPS
            || self.donation_fee_bps > MAX_FEE_BPS
        {
            return Err(MarketError::InvalidMarketConfigOption);
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
