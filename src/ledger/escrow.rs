//! Fee splits and the donation escrow.
//!
//! ## Fee semantics
//!
//! - **Entry** (buy): protocol fee and donation are charged *on top of* the
//!   quoted gross cost. The buyer pays `gross + protocol_fee + donation`;
//!   the market's `funds_held` is still credited exactly `gross`.
//! - **Exit** (sell): the protocol fee is deducted *from* gross proceeds;
//!   the seller receives `gross - protocol_fee`.
//!
//! Both shares are floored basis-point fractions (`amount * bps / 10000` in
//! integer math). Fee caps are enforced when a `FeeConfig` is set, never
//! here.
//!
//! ## Donation escrow
//!
//! Donations accrue to a per-recipient withdrawable balance keyed by the
//! recipient identity *at the time of accrual*. Changing a subject's
//! donation recipient is forward-only: the old recipient keeps what already
//! accrued, the new one accrues from the next trade.

use std::collections::HashMap;

use crate::ledger::custody::AccountId;
use crate::types::fixed::mul_bps;
use crate::types::{FeeConfig, SubjectId};

// ============================================================================
// Fee splits
// ============================================================================

/// Breakdown of a buy's funds flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySplit {
    /// Curve cost, credited in full to the market
    pub gross: u64,
    /// Protocol share, added on top of gross
    pub protocol_fee: u64,
    /// Donation share, added on top of gross, escrowed per recipient
    pub donation: u64,
    /// What the buyer pays: gross + protocol_fee + donation
    pub total_required: u64,
}

/// Breakdown of a sell's funds flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitSplit {
    /// Curve proceeds, debited in full from the market
    pub gross: u64,
    /// Protocol share, deducted from gross
    pub protocol_fee: u64,
    /// What the seller receives: gross - protocol_fee
    pub net: u64,
}

/// Split a buy's gross cost into the buyer's total and the fee shares.
///
/// Returns `None` only if the total overflows u64.
pub fn split_entry_fee(gross: u64, fees: &FeeConfig) -> Option<EntrySplit> {
    let protocol_fee = mul_bps(gross, fees.entry_fee_bps);
    let donation = mul_bps(gross, fees.donation_fee_bps);
    let total_required = gross.checked_add(protocol_fee)?.checked_add(donation)?;

    Some(EntrySplit {
        gross,
        protocol_fee,
        donation,
        total_required,
    })
}

/// Split a sell's gross proceeds into the seller's net and the protocol fee.
///
/// `protocol_fee <= gross` always holds (bps are at most 10000), so this
/// cannot fail.
pub fn split_exit_fee(gross: u64, fees: &FeeConfig) -> ExitSplit {
    let protocol_fee = mul_bps(gross, fees.exit_fee_bps);
    ExitSplit {
        gross,
        protocol_fee,
        net: gross - protocol_fee,
    }
}

// ============================================================================
// Donation escrow
// ============================================================================

/// Per-recipient donation escrow plus the per-subject recipient routing.
#[derive(Debug, Default)]
pub struct DonationLedger {
    /// Current donation recipient per subject, set at market creation and
    /// mutable forward-only
    recipients: HashMap<SubjectId, AccountId>,

    /// Withdrawable escrow, keyed by recipient at time of accrual
    escrow: HashMap<AccountId, u64>,

    /// Running total across all recipients, for O(1) reconciliation
    total: u64,
}

impl DonationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point a subject's future donations at `recipient`. Existing escrow
    /// balances are unaffected.
    pub fn set_recipient(&mut self, subject: SubjectId, recipient: AccountId) {
        self.recipients.insert(subject, recipient);
    }

    /// The subject's current donation recipient, if a market was created.
    pub fn recipient_of(&self, subject: SubjectId) -> Option<AccountId> {
        self.recipients.get(&subject).copied()
    }

    /// Credit a subject's current recipient with `amount`. Returns the
    /// recipient credited.
    ///
    /// The recipient is set when the market is created, before any trade can
    /// route a donation.
    pub fn route(&mut self, subject: SubjectId, amount: u64) -> AccountId {
        let recipient = *self
            .recipients
            .get(&subject)
            .expect("recipient is set at market creation");
        if amount > 0 {
            *self.escrow.entry(recipient).or_insert(0) += amount;
            self.total += amount;
        }
        recipient
    }

    /// Withdrawable balance of a recipient.
    pub fn balance_of(&self, recipient: AccountId) -> u64 {
        self.escrow.get(&recipient).copied().unwrap_or(0)
    }

    /// Total escrowed across all recipients.
    pub fn total_escrowed(&self) -> u64 {
        self.total
    }

    /// Zero a recipient's balance and return what it was. First phase of a
    /// withdrawal: the balance becomes unavailable before any transfer
    /// effect is visible.
    pub fn take_all(&mut self, recipient: AccountId) -> u64 {
        let amount = self.escrow.remove(&recipient).unwrap_or(0);
        self.total -= amount;
        amount
    }

    /// Compensating entry: restore a balance after a failed withdrawal
    /// transfer.
    pub fn restore(&mut self, recipient: AccountId, amount: u64) {
        if amount > 0 {
            *self.escrow.entry(recipient).or_insert(0) += amount;
            self.total += amount;
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixed::to_fixed;

    #[test]
    fn test_entry_split_adds_fees_on_top() {
        let fees = FeeConfig::new(200, 0, 100).unwrap();
        let gross = to_fixed("100.0").unwrap();

        let split = split_entry_fee(gross, &fees).unwrap();
        assert_eq!(split.gross, gross);
        assert_eq!(split.protocol_fee, to_fixed("2.0").unwrap());
        assert_eq!(split.donation, to_fixed("1.0").unwrap());
        assert_eq!(split.total_required, to_fixed("103.0").unwrap());
    }

    #[test]
    fn test_entry_split_zero_fees() {
        let split = split_entry_fee(12345, &FeeConfig::zero()).unwrap();
        assert_eq!(split.protocol_fee, 0);
        assert_eq!(split.donation, 0);
        assert_eq!(split.total_required, 12345);
    }

    #[test]
    fn test_entry_split_floors() {
        // 3 minimal units at 100 bps: 3 * 100 / 10000 = 0
        let fees = FeeConfig::new(100, 0, 100).unwrap();
        let split = split_entry_fee(3, &fees).unwrap();
        assert_eq!(split.protocol_fee, 0);
        assert_eq!(split.donation, 0);
        assert_eq!(split.total_required, 3);
    }

    #[test]
    fn test_exit_split_deducts_from_proceeds() {
        let fees = FeeConfig::new(0, 300, 0).unwrap();
        let gross = to_fixed("50.0").unwrap();

        let split = split_exit_fee(gross, &fees);
        assert_eq!(split.protocol_fee, to_fixed("1.5").unwrap());
        assert_eq!(split.net, to_fixed("48.5").unwrap());
        assert_eq!(split.net + split.protocol_fee, gross);
    }

    #[test]
    fn test_donation_routing_accrues() {
        let mut ledger = DonationLedger::new();
        ledger.set_recipient(7, 100);

        assert_eq!(ledger.route(7, 500), 100);
        assert_eq!(ledger.route(7, 250), 100);
        assert_eq!(ledger.balance_of(100), 750);
        assert_eq!(ledger.total_escrowed(), 750);
    }

    #[test]
    fn test_recipient_change_is_forward_only() {
        let mut ledger = DonationLedger::new();
        ledger.set_recipient(7, 100);
        ledger.route(7, 500);

        ledger.set_recipient(7, 200);
        ledger.route(7, 300);

        // old recipient keeps the old accrual, new one gets only the new
        assert_eq!(ledger.balance_of(100), 500);
        assert_eq!(ledger.balance_of(200), 300);
        assert_eq!(ledger.total_escrowed(), 800);
    }

    #[test]
    fn test_take_all_zeroes_balance() {
        let mut ledger = DonationLedger::new();
        ledger.set_recipient(7, 100);
        ledger.route(7, 500);

        assert_eq!(ledger.take_all(100), 500);
        assert_eq!(ledger.balance_of(100), 0);
        assert_eq!(ledger.total_escrowed(), 0);
        // second take yields nothing
        assert_eq!(ledger.take_all(100), 0);
    }

    #[test]
    fn test_restore_compensates() {
        let mut ledger = DonationLedger::new();
        ledger.set_recipient(7, 100);
        ledger.route(7, 500);

        let taken = ledger.take_all(100);
        ledger.restore(100, taken);
        assert_eq!(ledger.balance_of(100), 500);
        assert_eq!(ledger.total_escrowed(), 500);
    }
}
