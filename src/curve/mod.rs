//! Pricing Engine: pure bonding-curve pricing over market state.
//!
//! ## Price curve
//!
//! With `d = trust_votes - distrust_votes` and liquidity parameter `k`:
//!
//! ```text
//! price(trust)    = base_price * sigmoid(d / k)
//! price(distrust) = base_price - price(trust)
//! ```
//!
//! The distrust price is defined as the complement, so the price-sum
//! invariant holds exactly for every reachable state, not just within
//! rounding tolerance.
//!
//! ## Trade amounts as potential differences
//!
//! The cost of a trade is the definite integral of the marginal price, which
//! has the closed form `base_price * k * softplus(d / k)`. This module
//! evaluates that antiderivative as a fixed-point potential,
//!
//! ```text
//! potential(d) = floor(base_price * k * softplus(d / k))
//! ```
//!
//! and prices every trade as a difference of two potential values. Because
//! rounding happens once per *state* rather than once per *trade*, sums of
//! trade amounts telescope: buying N votes in one call costs exactly the
//! same as N sequential one-vote calls, and an immediate sell-back returns
//! exactly the cost paid. Path independence and the round-trip identity are
//! exact, not approximate. The potential floors rather than rounding to
//! nearest because flooring commutes with whole-unit shifts, which also
//! makes the two-sided identity exact: a trust buy plus an equal distrust
//! buy always costs exactly `units * base_price`.
//!
//! No function here mutates anything; `quote` and `execute` both call these
//! and therefore agree bit-for-bit.

pub mod logistic;

pub use logistic::{sigmoid, softplus, EXP_CUTOFF};

use rust_decimal::Decimal;

use crate::types::fixed::{decimal_to_fixed, decimal_to_fixed_floor};
use crate::types::{Market, MarketConfig, Side};

// ============================================================================
// Marginal price
// ============================================================================

/// Marginal price of one side at the given vote counts, in fixed-point.
///
/// The trust price comes from the sigmoid; the distrust price is its exact
/// complement to `base_price`.
pub fn marginal_price_at(
    config: &MarketConfig,
    trust_votes: u64,
    distrust_votes: u64,
    side: Side,
) -> u64 {
    let d = trust_votes as i64 - distrust_votes as i64;
    let x = Decimal::from(d) / Decimal::from(config.liquidity_parameter);

    // base_price is fixed-point already, so the sigmoid factor applies
    // directly: price_fixed = round(base_fixed * sigmoid)
    let trust_fixed = fixed_times(config.base_price, sigmoid(x))
        .expect("sigmoid lies in [0, 1], so the price fits the base");

    match side {
        Side::Trust => trust_fixed,
        Side::Distrust => config.base_price - trust_fixed,
    }
}

/// Scale a fixed-point value by a `Decimal` factor, rounding to the nearest
/// minimal unit.
fn fixed_times(value: u64, factor: Decimal) -> Option<u64> {
    decimal_to_fixed(Decimal::from(value) * factor / Decimal::from(crate::types::fixed::SCALE))
}

/// Marginal price of one side for a market's current state.
pub fn marginal_price(market: &Market, config: &MarketConfig, side: Side) -> u64 {
    marginal_price_at(config, market.trust_votes, market.distrust_votes, side)
}

// ============================================================================
// Cost potential
// ============================================================================

/// Fixed-point cost potential of one side at a signed own-minus-other
/// imbalance `d`:
///
/// ```text
/// potential(d) = floor(base_price * k * softplus(d / k))
/// ```
///
/// Monotone non-decreasing in `d`. Returns `None` if the value exceeds the
/// u64 fixed-point range or `base_price * k` overflows `Decimal` (extreme
/// base/k combinations), surfaced as `MathOverflow` by the executor.
pub fn potential(config: &MarketConfig, own_imbalance: i64) -> Option<u64> {
    let k = Decimal::from(config.liquidity_parameter);
    let x = Decimal::from(own_imbalance) / k;

    // k is a raw vote count, so base_fixed * k * softplus is fixed-point
    let scaled = Decimal::from(config.base_price)
        .checked_mul(k)?
        .checked_mul(softplus(x))?;
    decimal_to_fixed_floor(scaled / Decimal::from(crate::types::fixed::SCALE))
}

/// Gross cost to buy `units` votes on a side whose current own-minus-other
/// imbalance is `own_imbalance`.
///
/// `units = 0` costs 0. The caller guarantees `own_imbalance + units` stays
/// within the engine's vote cap.
pub fn buy_cost(config: &MarketConfig, own_imbalance: i64, units: u64) -> Option<u64> {
    if units == 0 {
        return Some(0);
    }
    let before = potential(config, own_imbalance)?;
    let after = potential(config, own_imbalance + units as i64)?;
    // potential is monotone and rounding preserves order
    after.checked_sub(before)
}

/// Gross proceeds of selling `units` votes back from the same imbalance.
///
/// The integral traversed in the opposite direction: identical to the cost
/// that was paid to buy those units, by construction.
pub fn sell_proceeds(config: &MarketConfig, own_imbalance: i64, units: u64) -> Option<u64> {
    if units == 0 {
        return Some(0);
    }
    let before = potential(config, own_imbalance)?;
    let after = potential(config, own_imbalance - units as i64)?;
    before.checked_sub(after)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixed::{approx_eq, to_fixed, SCALE};

    fn config(base: &str, k: u64) -> MarketConfig {
        MarketConfig::new(to_fixed(base).unwrap(), k, 0).unwrap()
    }

    #[test]
    fn test_balanced_market_prices_at_half_base() {
        let cfg = config("1.0", 1000);
        let trust = marginal_price_at(&cfg, 1, 1, Side::Trust);
        let distrust = marginal_price_at(&cfg, 1, 1, Side::Distrust);

        assert_eq!(trust, SCALE / 2);
        assert_eq!(distrust, SCALE / 2);
    }

    #[test]
    fn test_price_sum_invariant_exact() {
        let cfg = config("0.01", 250);
        let states = [(1u64, 1u64), (500, 1), (1, 500), (12345, 678), (3, 99999)];

        for (t, d) in states {
            let trust = marginal_price_at(&cfg, t, d, Side::Trust);
            let distrust = marginal_price_at(&cfg, t, d, Side::Distrust);
            assert_eq!(trust + distrust, cfg.base_price, "state ({}, {})", t, d);
        }
    }

    #[test]
    fn test_worked_scenario_sigmoid_of_one() {
        // seed 1/1, buy 1000 trust with k = 1000: d/k = 1,
        // price(trust) = base * e/(e+1) = base * 0.7310585786...
        let cfg = config("1.0", 1000);
        let price = marginal_price_at(&cfg, 1001, 1, Side::Trust);
        assert!(approx_eq(price, 73_105_858, 1), "got {}", price);
    }

    #[test]
    fn test_price_strictly_increasing_in_own_side() {
        let cfg = config("1.0", 100);
        let mut prev = 0;
        for t in [1u64, 10, 50, 100, 500] {
            let p = marginal_price_at(&cfg, t, 50, Side::Trust);
            assert!(p > prev || (t == 1 && p >= prev));
            prev = p;
        }
    }

    #[test]
    fn test_price_decreasing_in_opposing_side() {
        let cfg = config("1.0", 100);
        let near = marginal_price_at(&cfg, 100, 10, Side::Trust);
        let far = marginal_price_at(&cfg, 100, 200, Side::Trust);
        assert!(far < near);
    }

    #[test]
    fn test_buy_cost_zero_units() {
        let cfg = config("1.0", 1000);
        assert_eq!(buy_cost(&cfg, 0, 0), Some(0));
        assert_eq!(sell_proceeds(&cfg, 500, 0), Some(0));
    }

    #[test]
    fn test_worked_scenario_cost() {
        // cost of 1000 trust from balance, k = 1000, base = 1:
        // 1000 * (softplus(1) - softplus(0)) = 620.1145069582775
        let cfg = config("1.0", 1000);
        let cost = buy_cost(&cfg, 0, 1000).unwrap();
        assert!(approx_eq(cost, 62_011_450_696, 2), "got {}", cost);
    }

    #[test]
    fn test_path_independence_exact() {
        let cfg = config("0.01", 730);
        let batch = buy_cost(&cfg, -42, 1000).unwrap();

        let mut stepped = 0u64;
        for i in 0..1000i64 {
            stepped += buy_cost(&cfg, -42 + i, 1).unwrap();
        }

        assert_eq!(batch, stepped);
    }

    #[test]
    fn test_round_trip_exact() {
        let cfg = config("1.0", 500);
        for d in [-2000i64, -3, 0, 7, 1500] {
            let units = 250;
            let cost = buy_cost(&cfg, d, units).unwrap();
            let back = sell_proceeds(&cfg, d + units as i64, units).unwrap();
            assert_eq!(cost, back, "imbalance {}", d);
        }
    }

    #[test]
    fn test_buying_both_sides_costs_base_price_each_pair() {
        // buy X trust then X distrust from any state: total cost is exactly
        // X * base_price (softplus(x) - softplus(-x) = x)
        let cfg = config("2.5", 333);
        let x = 100u64;
        for d in [-500i64, 0, 911] {
            let trust_cost = buy_cost(&cfg, d, x).unwrap();
            // after the trust buy the distrust imbalance is -(d + x)
            let distrust_cost = buy_cost(&cfg, -(d + x as i64), x).unwrap();
            assert_eq!(
                trust_cost + distrust_cost,
                x * cfg.base_price,
                "imbalance {}",
                d
            );
        }
    }

    #[test]
    fn test_diminishing_second_difference_past_center() {
        // equal-size buys beyond the center: each cost exceeds the last, but
        // by strictly less each time (sigmoid is concave for d > 0)
        let cfg = config("1.0", 1000);
        let units = 500u64;
        let c1 = buy_cost(&cfg, 1000, units).unwrap();
        let c2 = buy_cost(&cfg, 1000 + units as i64, units).unwrap();
        let c3 = buy_cost(&cfg, 1000 + 2 * units as i64, units).unwrap();

        assert!(c2 > c1 && c3 > c2);
        assert!(c2 - c1 > c3 - c2);
    }

    #[test]
    fn test_price_displacement_ordered_from_center() {
        let cfg = config("1.0", 1000);
        let center = marginal_price_at(&cfg, 1, 1, Side::Trust);
        let p_x = marginal_price_at(&cfg, 1 + 500, 1, Side::Trust);
        let p_2x = marginal_price_at(&cfg, 1 + 1000, 1, Side::Trust);

        assert!(p_2x > p_x && p_x > center);
    }

    #[test]
    fn test_potential_overflow_returns_none() {
        // base * k past Decimal's range must surface as None, never panic
        let cfg = MarketConfig::new(u64::MAX, 10_000_000_000, 0).unwrap();
        assert_eq!(potential(&cfg, 0), None);
        assert_eq!(buy_cost(&cfg, 0, 1), None);
        assert_eq!(sell_proceeds(&cfg, 1, 1), None);
    }

    #[test]
    fn test_potential_saturates_deep_negative() {
        let cfg = config("1.0", 10);
        // far below the cutoff the potential is exactly zero
        assert_eq!(potential(&cfg, -100_000).unwrap(), 0);
    }
}
