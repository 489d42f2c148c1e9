//! # trustcurve
//!
//! Bonding-curve reputation markets with deterministic settlement.
//!
//! ## Architecture
//!
//! The engine consists of:
//! - **Types**: Core data structures (Market, Settlement, MarketConfig)
//! - **Curve**: Sigmoid pricing and the logistic cost potential
//! - **Ledger**: Fee/donation escrow and the funds-custody boundary
//! - **Engine**: Market store, participant registry, trade executor
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical inputs settle identically on any hardware
//! 2. **No Floating Point**: all funds math is fixed-point (10^8 scaling),
//!    curve evaluation runs on `rust_decimal`
//! 3. **Simulate = Execute**: quotes are the pricing path executions take,
//!    so a quote and its execution agree bit-for-bit
//! 4. **Synchronous Execution**: one sequential state machine, no async
//!
//! ## Market Model
//!
//! Each subject has one two-sided market (trust / distrust). Marginal prices
//! follow a logistic curve of the vote imbalance and always sum to the
//! config's base price. Trade amounts are differences of a cost potential,
//! which makes cumulative funds path-independent: the market's held funds
//! depend only on the current vote counts, never on trade history.
//!
//! ## Example
//!
//! ```
//! use trustcurve::engine::MarketEngine;
//! use trustcurve::ledger::{AllowAll, VaultCustody};
//! use trustcurve::types::fixed::to_fixed;
//! use trustcurve::types::{MarketConfig, Side};
//!
//! let mut engine = MarketEngine::new(1);
//! let config_id = engine
//!     .register_config(MarketConfig::new(to_fixed("1.0").unwrap(), 1000, 0).unwrap())
//!     .unwrap();
//!
//! let mut custody = VaultCustody::new();
//! custody.fund(100, to_fixed("1000.0").unwrap());
//!
//! engine.create_market(7, config_id, 100, &AllowAll, &mut custody).unwrap();
//! let receipt = engine
//!     .buy(7, Side::Trust, 100, 1, to_fixed("500.0").unwrap(), &mut custody, 0)
//!     .unwrap();
//! assert!(receipt.units_bought() > 0);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Market, Settlement, configs, fixed-point helpers
pub mod types;

/// Pricing curve: sigmoid marginal price and logistic cost potential
pub mod curve;

/// Ledger layer: fee/donation escrow, funds custody boundary
pub mod ledger;

/// Engine: market store, participants, trade executor
pub mod engine;

/// Error types shared across the crate
pub mod errors;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{BuyQuote, BuyReceipt, MarketEngine, Position, SellQuote, SellReceipt};
pub use errors::MarketError;
pub use ledger::{AccountId, AllowAll, CreationPolicy, FundsCustody, VaultCustody};
pub use types::{FeeConfig, Market, MarketConfig, Settlement, Side, SubjectId, TradeDirection};
