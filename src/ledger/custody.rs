//! Funds-custody collaborator boundary.
//!
//! The engine never holds external value itself; it instructs a custodian to
//! move value between external accounts and the engine's vault. A custody
//! failure always surfaces before any ledger mutation commits, so a rejected
//! transfer leaves every ledger untouched.
//!
//! [`VaultCustody`] is an in-memory implementation used by tests and the
//! demo binary. Its `vault_total` is the host-custodied total that the
//! funds-reconciliation invariant checks against:
//!
//! ```text
//! vault_total == sum(market.funds_held) + sum(donation escrow)
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::types::SubjectId;

/// External account identity (holders, fee recipients).
pub type AccountId = u64;

/// Failure modes of a custody transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CustodyError {
    /// The debited account does not hold the requested amount.
    #[error("insufficient account balance")]
    InsufficientBalance,

    /// The receiving party refused the transfer.
    #[error("transfer rejected by recipient")]
    TransferRejected,
}

/// Moves value between external accounts and the engine's vault.
///
/// `debit` pulls value from an account into the vault; `credit` pushes value
/// from the vault out to an account. Implementations must be atomic per
/// call: a returned error means nothing moved.
pub trait FundsCustody {
    /// Move `amount` (fixed-point) from `account` into the vault.
    fn debit(&mut self, account: AccountId, amount: u64) -> Result<(), CustodyError>;

    /// Move `amount` (fixed-point) from the vault out to `account`.
    fn credit(&mut self, account: AccountId, amount: u64) -> Result<(), CustodyError>;
}

/// Permission check consulted once at market creation.
pub trait CreationPolicy {
    /// May `caller` open a market for `subject`?
    fn can_create_market(&self, subject: SubjectId, caller: AccountId) -> bool;
}

/// Policy that lets anyone create any market.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl CreationPolicy for AllowAll {
    fn can_create_market(&self, _subject: SubjectId, _caller: AccountId) -> bool {
        true
    }
}

// ============================================================================
// In-memory custody
// ============================================================================

/// In-memory custodian: per-account balances plus a single engine vault.
///
/// Accounts marked via [`VaultCustody::refuse`] reject credits, which lets
/// tests exercise the `FeeTransferFailed` / `WithdrawalFailed` paths.
#[derive(Debug, Default)]
pub struct VaultCustody {
    balances: HashMap<AccountId, u64>,
    vault: u64,
    refusing: HashSet<AccountId>,
}

impl VaultCustody {
    /// Create an empty custodian.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into an external account (test/demo setup).
    pub fn fund(&mut self, account: AccountId, amount: u64) {
        *self.balances.entry(account).or_insert(0) += amount;
    }

    /// Mark an account as refusing all credits.
    pub fn refuse(&mut self, account: AccountId) {
        self.refusing.insert(account);
    }

    /// Stop refusing credits for an account.
    pub fn accept(&mut self, account: AccountId) {
        self.refusing.remove(&account);
    }

    /// Balance of an external account.
    pub fn balance_of(&self, account: AccountId) -> u64 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Total value currently custodied in the engine vault.
    pub fn vault_total(&self) -> u64 {
        self.vault
    }
}

impl FundsCustody for VaultCustody {
    fn debit(&mut self, account: AccountId, amount: u64) -> Result<(), CustodyError> {
        let balance = self.balances.entry(account).or_insert(0);
        if *balance < amount {
            return Err(CustodyError::InsufficientBalance);
        }
        *balance -= amount;
        self.vault += amount;
        Ok(())
    }

    fn credit(&mut self, account: AccountId, amount: u64) -> Result<(), CustodyError> {
        if self.refusing.contains(&account) {
            return Err(CustodyError::TransferRejected);
        }
        debug_assert!(self.vault >= amount, "credit exceeds vault total");
        self.vault -= amount;
        *self.balances.entry(account).or_insert(0) += amount;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
