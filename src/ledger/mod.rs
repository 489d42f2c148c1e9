//! Fee & Donation Ledger and the funds-custody boundary.
//!
//! [`escrow`] computes fee splits and maintains per-recipient donation
//! escrow; [`custody`] defines the collaborator traits through which the
//! engine moves external value ([`FundsCustody`], [`CreationPolicy`]) and an
//! in-memory custodian for tests.

pub mod custody;
pub mod escrow;

pub use custody::{AccountId, AllowAll, CreationPolicy, CustodyError, FundsCustody, VaultCustody};
pub use escrow::{split_entry_fee, split_exit_fee, DonationLedger, EntrySplit, ExitSplit};
