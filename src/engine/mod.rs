//! Engine layer: market store, participant registry, and the trade executor.
//!
//! ## Architecture
//!
//! ```text
//!                    MarketEngine (executor)
//!                   /       |        \
//!          MarketStore  Participant  DonationLedger
//!          (slab+index)  Registry     (escrow)
//!                   \       |        /
//!                    FundsCustody (host trait)
//! ```
//!
//! [`MarketStore`] owns the per-subject market records, [`ParticipantRegistry`]
//! tracks who ever traded where, and [`MarketEngine`] orchestrates quotes and
//! settlement on top of both, delegating fund movement to the host's
//! [`FundsCustody`](crate::ledger::FundsCustody) implementation.

pub mod executor;
pub mod participants;
pub mod store;

pub use executor::{BuyQuote, BuyReceipt, MarketEngine, Position, SellQuote, SellReceipt};
pub use participants::ParticipantRegistry;
pub use store::MarketStore;
