//! Fixed-point value utilities.
//!
//! ## Overview
//!
//! All prices, costs, and escrow balances in trustcurve use fixed-point
//! representation: u64 scaled by 10^8. Vote counts are plain integers and
//! are never scaled.
//!
//! ## Why Fixed-Point?
//!
//! Floating-point arithmetic can produce different results on different
//! hardware, breaking determinism. Quotes and executions must agree
//! bit-for-bit, so every value that crosses the engine boundary is an
//! integer number of minimal units (10^-8).
//!
//! ## Rounding
//!
//! Conversion from `Decimal` rounds to the nearest minimal unit with
//! `round_dp(0)` (midpoint to even). Basis-point fee math floors instead;
//! see [`mul_bps`].

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
///
/// One minimal unit is 10^-8 of a funds unit.
pub const SCALE: u64 = 100_000_000;

/// Largest whole-number value representable without overflow:
/// u64::MAX / SCALE, roughly 184 billion funds units.
pub const MAX_VALUE: u64 = u64::MAX / SCALE;

/// Basis-point denominator: 10000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Parse a decimal string into fixed-point u64.
///
/// # Returns
///
/// * `Some(u64)` - the fixed-point representation
/// * `None` - if parsing fails, the value is negative, or out of range
///
/// # Example
///
/// ```
/// use trustcurve::types::fixed::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a `Decimal` to fixed-point u64, rounding to the nearest minimal
/// unit (midpoint to even).
///
/// Returns `None` for negative or out-of-range values.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    let rounded = scaled.round_dp(0);
    rounded.to_u64()
}

/// Convert a `Decimal` to fixed-point u64, rounding toward zero.
///
/// Used for the curve's cost potential: flooring commutes with adding whole
/// minimal units, which keeps the path-independence and complement
/// identities exact. Banker's rounding does not (midpoints break ties by
/// parity), so it is reserved for display-level conversions.
pub fn decimal_to_fixed_floor(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.trunc().to_u64()
}

/// Convert fixed-point u64 to a `Decimal`.
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Render a fixed-point value with all 8 decimal places.
///
/// # Example
///
/// ```
/// use trustcurve::types::fixed::from_fixed;
///
/// assert_eq!(from_fixed(100_000_000), "1.00000000");
/// assert_eq!(from_fixed(73_105_858), "0.73105858");
/// ```
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Add two fixed-point values, `None` on overflow.
pub fn checked_add(a: u64, b: u64) -> Option<u64> {
    a.checked_add(b)
}

/// Subtract two fixed-point values, `None` on underflow.
pub fn checked_sub(a: u64, b: u64) -> Option<u64> {
    a.checked_sub(b)
}

/// Take a basis-point share of a fixed-point amount, flooring.
///
/// The product is widened to u128 so `amount * bps` cannot overflow. With
/// `bps <= 10000` the result always fits back into u64.
///
/// # Example
///
/// ```
/// use trustcurve::types::fixed::mul_bps;
///
/// // 200 bps of 1.00000000 = 0.02000000
/// assert_eq!(mul_bps(100_000_000, 200), 2_000_000);
/// // floors: 1 minimal unit at 9999 bps is 0
/// assert_eq!(mul_bps(1, 9_999), 0);
/// ```
pub fn mul_bps(amount: u64, bps: u16) -> u64 {
    let wide = (amount as u128) * (bps as u128) / (BPS_DENOMINATOR as u128);
    wide as u64
}

// ============================================================================
// Comparison Helpers
// ============================================================================

/// Compare two fixed-point values with a tolerance (for testing).
///
/// Returns `true` if |a - b| <= tolerance.
pub fn approx_eq(a: u64, b: u64, tolerance: u64) -> bool {
    if a >= b {
        a - b <= tolerance
    } else {
        b - a <= tolerance
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
