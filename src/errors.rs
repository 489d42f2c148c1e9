//! Error taxonomy for the reputation market engine.
//!
//! ## Categories
//!
//! - **Precondition errors**: rejected before any computation
//!   (`MarketDoesNotExist`, `MarketAlreadyExists`, `InvalidMarketConfigOption`,
//!   `MarketCreationUnauthorized`)
//! - **Economic errors**: rejected after quoting, before mutation
//!   (`InsufficientFunds`, `SellSlippageLimitExceeded`, `InsufficientPosition`)
//! - **Transfer errors**: surfaced from the funds-custody collaborator
//!   (`FeeTransferFailed`, `WithdrawalFailed`)
//!
//! Every rejected operation leaves the market, position, and escrow ledgers
//! exactly as they were before the call. The engine never retries; a repeated
//! identical call against unchanged state produces the identical result.

use thiserror::Error;

/// All failure modes of the market engine.
///
/// Variants are discriminated so callers can branch programmatically rather
/// than parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MarketError {
    /// No market exists for the requested subject.
    #[error("no market exists for subject {0}")]
    MarketDoesNotExist(u64),

    /// A market already exists for this subject; creation is one-shot.
    #[error("market already exists for subject {0}")]
    MarketAlreadyExists(u64),

    /// A config value failed validation at registration/set time.
    /// Fee caps are enforced here, never at trade time.
    #[error("invalid market config option")]
    InvalidMarketConfigOption,

    /// The creation policy denied this caller for this subject.
    #[error("caller {caller} may not create a market for subject {subject}")]
    MarketCreationUnauthorized { subject: u64, caller: u64 },

    /// Buy bound violated: required funds exceed the caller's maximum, the
    /// obtainable units fall below the caller's minimum, or the buyer's
    /// custody debit failed.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Sell bound violated: net proceeds fell below the caller's minimum.
    #[error("sell slippage limit exceeded")]
    SellSlippageLimitExceeded,

    /// The holder (or the market's outstanding count) cannot cover the
    /// requested sell. The seed unit on each side is a hard floor.
    #[error("insufficient position")]
    InsufficientPosition,

    /// A fee/proceeds transfer through the custody collaborator failed.
    /// Any completed leg has been compensated; no ledger mutation occurred.
    #[error("fee transfer failed")]
    FeeTransferFailed,

    /// The custody credit of a donation withdrawal failed. The escrow
    /// balance has been restored by an explicit compensating entry.
    #[error("withdrawal failed")]
    WithdrawalFailed,

    /// Arithmetic guard tripped (vote counts or funds out of range).
    #[error("arithmetic overflow")]
    MathOverflow,
}
