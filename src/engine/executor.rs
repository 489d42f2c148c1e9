//! Trade Executor: the market engine's mutation surface.
//!
//! ## Trade pipeline
//!
//! Every `buy`/`sell` runs the same sequence, atomically per call:
//!
//! 1. **Validate** - market exists; for sells, the holder owns enough
//! 2. **Quote** - pure pricing against current state (`quote_buy` /
//!    `quote_sell` run only this step and are the simulate surface; they
//!    agree with execution bit-for-bit because execution calls them)
//! 3. **Fee split** - entry fees on top of cost, exit fee out of proceeds
//! 4. **Bounds** - caller-supplied slippage limits
//! 5. **Transfer** - all fallible custody movements, compensated on partial
//!    failure, before any ledger mutation
//! 6. **Mutate & record** - vote counts, funds, position, participant set,
//!    donation escrow; emit one settlement record
//!
//! A rejected operation at any step leaves every ledger untouched.

use std::collections::HashMap;

use crate::curve;
use crate::errors::MarketError;
use crate::ledger::custody::{AccountId, CreationPolicy, FundsCustody};
use crate::ledger::escrow::{split_entry_fee, split_exit_fee, DonationLedger};
use crate::ledger::{EntrySplit, ExitSplit};
use crate::engine::participants::ParticipantRegistry;
use crate::engine::store::MarketStore;
use crate::types::{
    ConfigId, FeeConfig, Market, MarketConfig, Settlement, Side, SubjectId, TradeDirection,
    MAX_VOTES_PER_SIDE,
};

// ============================================================================
// Results
// ============================================================================

/// Priced outcome of a (possible) buy. Returned by `quote_buy` and embedded
/// in the receipt of an executed buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyQuote {
    /// Side quoted
    pub side: Side,
    /// Units obtainable at this quote
    pub units: u64,
    /// Curve cost, credited to the market on execution
    pub gross_cost: u64,
    /// Protocol entry fee, charged on top
    pub protocol_fee: u64,
    /// Donation share, charged on top and escrowed
    pub donation: u64,
    /// Total funds required from the buyer
    pub total_required: u64,
    /// Marginal price of the side after the buy
    pub new_price: u64,
}

/// Priced outcome of a (possible) sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellQuote {
    /// Side quoted
    pub side: Side,
    /// Units to sell
    pub units: u64,
    /// Curve proceeds, debited from the market on execution
    pub gross_proceeds: u64,
    /// Protocol exit fee, deducted from proceeds
    pub protocol_fee: u64,
    /// What the seller receives
    pub net_proceeds: u64,
    /// Marginal price of the side after the sell
    pub new_price: u64,
}

/// Result of an executed buy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyReceipt {
    /// The quote the trade settled at
    pub quote: BuyQuote,
    /// Record for external indexers
    pub settlement: Settlement,
}

impl BuyReceipt {
    /// Units credited to the buyer.
    pub fn units_bought(&self) -> u64 {
        self.quote.units
    }

    /// Funds debited from the buyer (gross + fees + donation).
    pub fn funds_paid(&self) -> u64 {
        self.quote.total_required
    }
}

/// Result of an executed sell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellReceipt {
    /// The quote the trade settled at
    pub quote: SellQuote,
    /// Record for external indexers
    pub settlement: Settlement,
}

impl SellReceipt {
    /// Net funds credited to the seller.
    pub fn proceeds(&self) -> u64 {
        self.quote.net_proceeds
    }
}

/// A holder's outstanding units in one market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Trust units held
    pub trust: u64,
    /// Distrust units held
    pub distrust: u64,
}

impl Position {
    /// Units held on one side.
    pub fn on_side(&self, side: Side) -> u64 {
        match side {
            Side::Trust => self.trust,
            Side::Distrust => self.distrust,
        }
    }

    fn on_side_mut(&mut self, side: Side) -> &mut u64 {
        match side {
            Side::Trust => &mut self.trust,
            Side::Distrust => &mut self.distrust,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// The reputation market engine: one instance owns all markets, positions,
/// participants, and the donation escrow.
///
/// The engine is a sequential state machine - every method takes `&self` or
/// `&mut self` and completes atomically. Hosts needing cross-writer
/// concurrency wrap it in their own per-subject transaction boundary.
#[derive(Debug)]
pub struct MarketEngine {
    store: MarketStore,
    configs: Vec<MarketConfig>,
    fees: FeeConfig,
    positions: HashMap<(AccountId, SubjectId), Position>,
    participants: ParticipantRegistry,
    donations: DonationLedger,
    protocol_recipient: AccountId,
}

impl MarketEngine {
    /// Create an engine. Protocol fees and creation costs are credited to
    /// `protocol_recipient`. Fees start at zero.
    pub fn new(protocol_recipient: AccountId) -> Self {
        Self {
            store: MarketStore::new(),
            configs: Vec::new(),
            fees: FeeConfig::zero(),
            positions: HashMap::new(),
            participants: ParticipantRegistry::new(),
            donations: DonationLedger::new(),
            protocol_recipient,
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Register an immutable market config; markets reference it by the
    /// returned id. Validation happens here, never at trade time.
    pub fn register_config(&mut self, config: MarketConfig) -> Result<ConfigId, MarketError> {
        if config.base_price == 0 || config.liquidity_parameter == 0 {
            return Err(MarketError::InvalidMarketConfigOption);
        }
        let id = self.configs.len() as ConfigId;
        self.configs.push(config);
        Ok(id)
    }

    /// The config registered under `id`.
    pub fn config(&self, id: ConfigId) -> Option<&MarketConfig> {
        self.configs.get(id as usize)
    }

    /// Replace the fee snapshot. Applies to the next trade; trades already
    /// executed are untouched.
    pub fn set_fee_config(&mut self, fees: FeeConfig) -> Result<(), MarketError> {
        fees.validate()?;
        self.fees = fees;
        Ok(())
    }

    /// The current fee snapshot.
    pub fn fee_config(&self) -> FeeConfig {
        self.fees
    }

    // ========================================================================
    // Market lifecycle
    // ========================================================================

    /// Create a market for `subject` under a registered config.
    ///
    /// Charges the config's `creation_cost` from `caller` through custody
    /// (routed to the protocol recipient), seeds one vote per side, and
    /// makes `caller` the initial donation recipient.
    ///
    /// # Errors
    ///
    /// - `InvalidMarketConfigOption` - unknown config id
    /// - `MarketCreationUnauthorized` - the policy denied the caller
    /// - `MarketAlreadyExists` - creation is one-shot per subject
    /// - `InsufficientFunds` / `FeeTransferFailed` - creation cost transfer
    pub fn create_market(
        &mut self,
        subject: SubjectId,
        config_id: ConfigId,
        caller: AccountId,
        policy: &dyn CreationPolicy,
        custody: &mut dyn FundsCustody,
    ) -> Result<SubjectId, MarketError> {
        let config = *self
            .config(config_id)
            .ok_or(MarketError::InvalidMarketConfigOption)?;

        if !policy.can_create_market(subject, caller) {
            return Err(MarketError::MarketCreationUnauthorized { subject, caller });
        }
        if self.store.contains(subject) {
            return Err(MarketError::MarketAlreadyExists(subject));
        }

        if config.creation_cost > 0 {
            custody
                .debit(caller, config.creation_cost)
                .map_err(|_| MarketError::InsufficientFunds)?;
            if custody.credit(self.protocol_recipient, config.creation_cost).is_err() {
                // compensate the debit; if custody also refuses that, it has
                // broken its own atomicity contract
                let _ = custody.credit(caller, config.creation_cost);
                return Err(MarketError::FeeTransferFailed);
            }
        }

        self.store.insert(Market::new(subject, config_id))?;
        self.donations.set_recipient(subject, caller);
        Ok(subject)
    }

    // ========================================================================
    // Quotes (the simulate surface)
    // ========================================================================

    /// Price a buy of exactly `units` against current state. Pure: no
    /// mutation, identical to what `buy` settles at for the same unit count.
    pub fn quote_buy(
        &self,
        subject: SubjectId,
        side: Side,
        units: u64,
    ) -> Result<BuyQuote, MarketError> {
        let market = self.market(subject)?;
        let config = self.config_of(market);
        let split = self.price_buy(market, config, side, units)?;

        Ok(BuyQuote {
            side,
            units,
            gross_cost: split.gross,
            protocol_fee: split.protocol_fee,
            donation: split.donation,
            total_required: split.total_required,
            new_price: self.price_after(market, config, side, units, TradeDirection::Buy),
        })
    }

    /// Price a sell of exactly `units` against current state. Pure.
    ///
    /// Fails `InsufficientPosition` if `units` exceeds the side's sellable
    /// outstanding count (the seed unit is a hard floor). Holder ownership
    /// is checked at execution, not here: a quote is holder-agnostic.
    pub fn quote_sell(
        &self,
        subject: SubjectId,
        side: Side,
        units: u64,
    ) -> Result<SellQuote, MarketError> {
        let market = self.market(subject)?;
        let config = self.config_of(market);
        let split = self.price_sell(market, config, side, units)?;

        Ok(SellQuote {
            side,
            units,
            gross_proceeds: split.gross,
            protocol_fee: split.protocol_fee,
            net_proceeds: split.net,
            new_price: self.price_after(market, config, side, units, TradeDirection::Sell),
        })
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Buy as many units as `max_funds` affords, subject to the caller's
    /// slippage floor `min_units`.
    ///
    /// Resolves the largest unit count whose total (gross plus fees) fits in
    /// `max_funds`; fails `InsufficientFunds` if that count is zero or below
    /// `min_units`. The buyer is debited the resolved quote's
    /// `total_required` exactly.
    pub fn buy(
        &mut self,
        subject: SubjectId,
        side: Side,
        buyer: AccountId,
        min_units: u64,
        max_funds: u64,
        custody: &mut dyn FundsCustody,
        timestamp: u64,
    ) -> Result<BuyReceipt, MarketError> {
        let units = self.max_affordable(subject, side, max_funds)?;
        if units == 0 || units < min_units {
            return Err(MarketError::InsufficientFunds);
        }

        let quote = self.quote_buy(subject, side, units)?;

        // overflow guard before any transfer happens
        let market = self.market(subject)?;
        let new_funds = market
            .funds_held
            .checked_add(quote.gross_cost)
            .ok_or(MarketError::MathOverflow)?;

        // 5. transfers: debit the buyer, route the protocol fee outward
        custody
            .debit(buyer, quote.total_required)
            .map_err(|_| MarketError::InsufficientFunds)?;
        if quote.protocol_fee > 0 {
            if custody.credit(self.protocol_recipient, quote.protocol_fee).is_err() {
                let _ = custody.credit(buyer, quote.total_required);
                return Err(MarketError::FeeTransferFailed);
            }
        }

        // 6. mutate: infallible from here on
        let market = self
            .store
            .get_mut(subject)
            .expect("market existence checked above");
        market
            .add_votes(side, units)
            .expect("vote cap checked while quoting");
        market.funds_held = new_funds;

        *self
            .positions
            .entry((buyer, subject))
            .or_default()
            .on_side_mut(side) += units;
        self.participants.record(subject, buyer);
        self.donations.route(subject, quote.donation);

        let settlement = Settlement::new(
            subject,
            side,
            TradeDirection::Buy,
            units,
            quote.gross_cost,
            quote.new_price,
            timestamp,
        );
        Ok(BuyReceipt { quote, settlement })
    }

    /// Sell exactly `units` from the seller's position, subject to the
    /// slippage floor `min_proceeds` on the net amount.
    pub fn sell(
        &mut self,
        subject: SubjectId,
        side: Side,
        seller: AccountId,
        units: u64,
        min_proceeds: u64,
        custody: &mut dyn FundsCustody,
        timestamp: u64,
    ) -> Result<SellReceipt, MarketError> {
        // 1. validate holder ownership before pricing anything
        let held = self.position(seller, subject).on_side(side);
        if held < units {
            return Err(MarketError::InsufficientPosition);
        }

        let quote = self.quote_sell(subject, side, units)?;

        // 4. slippage bound on what the seller actually receives
        if quote.net_proceeds < min_proceeds {
            return Err(MarketError::SellSlippageLimitExceeded);
        }

        let market = self.market(subject)?;
        let new_funds = market
            .funds_held
            .checked_sub(quote.gross_proceeds)
            .ok_or(MarketError::MathOverflow)?;

        // 5. transfers: fee leg first, then the seller; compensate the fee
        // leg if the seller's custody rejects the proceeds
        if quote.protocol_fee > 0 {
            custody
                .credit(self.protocol_recipient, quote.protocol_fee)
                .map_err(|_| MarketError::FeeTransferFailed)?;
        }
        if quote.net_proceeds > 0 {
            if custody.credit(seller, quote.net_proceeds).is_err() {
                if quote.protocol_fee > 0 {
                    let _ = custody.debit(self.protocol_recipient, quote.protocol_fee);
                }
                return Err(MarketError::FeeTransferFailed);
            }
        }

        // 6. mutate
        let market = self
            .store
            .get_mut(subject)
            .expect("market existence checked above");
        market
            .remove_votes(side, units)
            .expect("outstanding count checked while quoting");
        market.funds_held = new_funds;

        *self
            .positions
            .entry((seller, subject))
            .or_default()
            .on_side_mut(side) -= units;
        self.participants.record(subject, seller);

        let settlement = Settlement::new(
            subject,
            side,
            TradeDirection::Sell,
            units,
            quote.gross_proceeds,
            quote.new_price,
            timestamp,
        );
        Ok(SellReceipt { quote, settlement })
    }

    // ========================================================================
    // Donations
    // ========================================================================

    /// Withdraw a recipient's full donation escrow.
    ///
    /// Two-phase: the balance is zeroed before the custody transfer is
    /// attempted, so a second withdrawal started in between would find
    /// nothing. A failed transfer restores the balance with an explicit
    /// compensating entry and surfaces `WithdrawalFailed`.
    pub fn withdraw_donations(
        &mut self,
        recipient: AccountId,
        custody: &mut dyn FundsCustody,
    ) -> Result<u64, MarketError> {
        let amount = self.donations.take_all(recipient);
        if amount == 0 {
            return Err(MarketError::InsufficientFunds);
        }

        if custody.credit(recipient, amount).is_err() {
            self.donations.restore(recipient, amount);
            return Err(MarketError::WithdrawalFailed);
        }
        Ok(amount)
    }

    /// Point a subject's future donations at a new recipient. Escrow already
    /// accrued stays with the prior recipient.
    pub fn set_donation_recipient(
        &mut self,
        subject: SubjectId,
        recipient: AccountId,
    ) -> Result<(), MarketError> {
        if !self.store.contains(subject) {
            return Err(MarketError::MarketDoesNotExist(subject));
        }
        self.donations.set_recipient(subject, recipient);
        Ok(())
    }

    /// A subject's current donation recipient.
    pub fn donation_recipient(&self, subject: SubjectId) -> Result<AccountId, MarketError> {
        self.donations
            .recipient_of(subject)
            .ok_or(MarketError::MarketDoesNotExist(subject))
    }

    /// Withdrawable escrow balance of a recipient.
    pub fn donation_balance(&self, recipient: AccountId) -> u64 {
        self.donations.balance_of(recipient)
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    /// The market for a subject.
    pub fn market(&self, subject: SubjectId) -> Result<&Market, MarketError> {
        self.store
            .get(subject)
            .ok_or(MarketError::MarketDoesNotExist(subject))
    }

    /// A holder's position in a market (zero if they never traded).
    pub fn position(&self, holder: AccountId, subject: SubjectId) -> Position {
        self.positions
            .get(&(holder, subject))
            .copied()
            .unwrap_or_default()
    }

    /// Whether a holder ever traded in the market.
    pub fn is_participant(&self, subject: SubjectId, holder: AccountId) -> bool {
        self.participants.is_participant(subject, holder)
    }

    /// Number of distinct holders that ever traded in the market.
    pub fn participant_count(&self, subject: SubjectId) -> usize {
        self.participants.count(subject)
    }

    /// All participants of a market in stable insertion order.
    pub fn participants(&self, subject: SubjectId) -> &[AccountId] {
        self.participants.participants(subject)
    }

    /// Current marginal price of one side.
    pub fn marginal_price(&self, subject: SubjectId, side: Side) -> Result<u64, MarketError> {
        let market = self.market(subject)?;
        Ok(curve::marginal_price(market, self.config_of(market), side))
    }

    /// Sum of `funds_held` across all markets.
    pub fn total_funds_held(&self) -> u64 {
        self.store.total_funds_held()
    }

    /// Total donation escrow across all recipients.
    pub fn total_escrowed(&self) -> u64 {
        self.donations.total_escrowed()
    }

    /// SHA-256 state root over all markets (see [`MarketStore::state_root`]).
    pub fn state_root(&self) -> [u8; 32] {
        self.store.state_root()
    }

    /// The state root as hex.
    pub fn state_root_hex(&self) -> String {
        self.store.state_root_hex()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn config_of(&self, market: &Market) -> &MarketConfig {
        self.configs
            .get(market.config_id as usize)
            .expect("markets only reference registered configs")
    }

    fn price_buy(
        &self,
        market: &Market,
        config: &MarketConfig,
        side: Side,
        units: u64,
    ) -> Result<EntrySplit, MarketError> {
        let room = MAX_VOTES_PER_SIDE - market.votes(side);
        if units > room {
            return Err(MarketError::MathOverflow);
        }

        let gross = curve::buy_cost(config, market.imbalance(side), units)
            .ok_or(MarketError::MathOverflow)?;
        split_entry_fee(gross, &self.fees).ok_or(MarketError::MathOverflow)
    }

    fn price_sell(
        &self,
        market: &Market,
        config: &MarketConfig,
        side: Side,
        units: u64,
    ) -> Result<ExitSplit, MarketError> {
        // the seed unit is never sellable
        if units > market.votes(side) - 1 {
            return Err(MarketError::InsufficientPosition);
        }

        let gross = curve::sell_proceeds(config, market.imbalance(side), units)
            .ok_or(MarketError::MathOverflow)?;
        Ok(split_exit_fee(gross, &self.fees))
    }

    /// Marginal price of `side` after a hypothetical trade.
    fn price_after(
        &self,
        market: &Market,
        config: &MarketConfig,
        side: Side,
        units: u64,
        direction: TradeDirection,
    ) -> u64 {
        let (mut trust, mut distrust) = (market.trust_votes, market.distrust_votes);
        let own = match side {
            Side::Trust => &mut trust,
            Side::Distrust => &mut distrust,
        };
        match direction {
            TradeDirection::Buy => *own += units,
            TradeDirection::Sell => *own -= units,
        }
        curve::marginal_price_at(config, trust, distrust, side)
    }

    /// Largest unit count whose buy total fits within `max_funds`.
    ///
    /// The total is strictly increasing in units, so exponential growth
    /// followed by binary search resolves it in O(log units) closed-form
    /// evaluations.
    fn max_affordable(
        &self,
        subject: SubjectId,
        side: Side,
        max_funds: u64,
    ) -> Result<u64, MarketError> {
        let market = self.market(subject)?;
        let config = self.config_of(market);
        let room = MAX_VOTES_PER_SIDE - market.votes(side);

        let affordable = |units: u64| -> bool {
            self.price_buy(market, config, side, units)
                .map(|split| split.total_required <= max_funds)
                .unwrap_or(false)
        };

        if room == 0 || !affordable(1) {
            return Ok(0);
        }

        // grow until unaffordable (or the vote cap)
        let mut lo = 1u64;
        let mut hi = loop {
            if lo == room {
                return Ok(room);
            }
            let next = lo.saturating_mul(2).min(room);
            if affordable(next) {
                lo = next;
            } else {
                break next;
            }
        };

        // invariant: affordable(lo), !affordable(hi)
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            if affordable(mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(lo)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
