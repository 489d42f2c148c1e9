//! Core data types for the reputation market engine.
//!
//! - [`Side`] / [`TradeDirection`]: two-variant enums matched exhaustively
//!   throughout pricing and execution
//! - [`fixed`]: fixed-point u64 utilities (10^8 scale)
//! - [`MarketConfig`] / [`FeeConfig`]: versioned curve and fee parameters
//! - [`Market`]: per-subject state record
//! - [`Settlement`]: per-trade record for external indexers

pub mod config;
pub mod fixed;
pub mod market;
pub mod settlement;
pub mod side;

pub use config::{ConfigId, FeeConfig, MarketConfig, MAX_FEE_BPS};
pub use market::{Market, SubjectId, MAX_VOTES_PER_SIDE};
pub use settlement::Settlement;
pub use side::{Side, TradeDirection};
