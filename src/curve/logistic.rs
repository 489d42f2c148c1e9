//! Numerically stable logistic primitives over `Decimal`.
//!
//! ## Stability
//!
//! `rust_decimal`'s `exp` is a Taylor expansion and loses precision (and
//! time) on large-magnitude arguments, so every exponential here goes
//! through [`exp_neg`], which only ever feeds the Taylor series a fraction
//! in `[0, 1)`:
//!
//! ```text
//! e^-m = 1 / (E^floor(m) * e^frac(m))        m >= 0
//! ```
//!
//! `sigmoid` and `softplus` are then written in terms of `e^-|x|`, which is
//! always in `(0, 1]`, so nothing ever overflows `Decimal`.
//!
//! ## Cutoff
//!
//! Beyond |x| = 60 the correction terms are below 10^-26, far under the
//! minimal fixed-point unit even after scaling by any representable
//! `base_price * k`, so the asymptote value is returned directly.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, MathematicalOps};

/// Argument magnitude beyond which the asymptote is exact at fixed-point
/// resolution: e^-60 is about 8.8e-27.
pub const EXP_CUTOFF: u32 = 60;

/// e^-m for m in [0, EXP_CUTOFF], via argument reduction.
fn exp_neg(m: Decimal) -> Decimal {
    let whole = m.floor();
    let frac = m - whole;

    let n = whole
        .to_i64()
        .expect("cutoff keeps the exponent within i64");
    let grown = Decimal::E.powi(n) * frac.exp();
    Decimal::ONE / grown
}

/// Logistic sigmoid: 1 / (1 + e^-x).
///
/// Strictly increasing, sigmoid(0) = 0.5, saturating to 0 and 1 at the
/// cutoff.
pub fn sigmoid(x: Decimal) -> Decimal {
    let cutoff = Decimal::from(EXP_CUTOFF);
    if x >= cutoff {
        return Decimal::ONE;
    }
    if x <= -cutoff {
        return Decimal::ZERO;
    }

    if x.is_sign_negative() {
        // sigmoid(x) = e^x / (1 + e^x), with e^x = e^-|x| in (0, 1)
        let e = exp_neg(-x);
        e / (Decimal::ONE + e)
    } else {
        Decimal::ONE / (Decimal::ONE + exp_neg(x))
    }
}

/// Softplus: ln(1 + e^x), the antiderivative of the sigmoid.
///
/// Computed as max(x, 0) + ln(1 + e^-|x|) so the log argument stays in
/// (1, 2].
pub fn softplus(x: Decimal) -> Decimal {
    let cutoff = Decimal::from(EXP_CUTOFF);
    if x >= cutoff {
        return x;
    }
    if x <= -cutoff {
        return Decimal::ZERO;
    }

    let correction = (Decimal::ONE + exp_neg(x.abs())).ln();
    if x.is_sign_negative() {
        correction
    } else {
        x + correction
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
