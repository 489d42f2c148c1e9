//! Benchmarks for the trustcurve pricing and settlement paths.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- quote_latency
//!
//! # Run with verbose output
//! cargo bench -- --verbose
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use std::time::Duration;

use trustcurve::engine::MarketEngine;
use trustcurve::ledger::{AllowAll, VaultCustody};
use trustcurve::types::fixed::SCALE;
use trustcurve::types::{FeeConfig, MarketConfig, Side};

// ============================================================================
// HELPER FUNCTIONS - Deterministic market setup
// ============================================================================

const PROTOCOL: u64 = 1;
const SUBJECT: u64 = 7;
const TRADER: u64 = 100;

/// One market (base 1.0, k = 1000, 1% entry / 1% exit / 0.5% donation) with a
/// generously funded trader.
fn setup_engine() -> (MarketEngine, VaultCustody) {
    let mut engine = MarketEngine::new(PROTOCOL);
    let config_id = engine
        .register_config(MarketConfig::new(SCALE, 1000, 0).expect("valid config"))
        .expect("first config");
    engine
        .set_fee_config(FeeConfig::new(100, 100, 50).expect("fees under cap"))
        .expect("validated fees");

    let mut custody = VaultCustody::new();
    custody.fund(TRADER, u64::MAX / 4);

    engine
        .create_market(SUBJECT, config_id, TRADER, &AllowAll, &mut custody)
        .expect("fresh subject");
    (engine, custody)
}

/// Same setup with `units` trust votes already bought, so quotes run against
/// a market away from the curve's center.
fn setup_traded_engine(units: u64) -> (MarketEngine, VaultCustody) {
    let (mut engine, mut custody) = setup_engine();
    let quote = engine
        .quote_buy(SUBJECT, Side::Trust, units)
        .expect("quotable");
    engine
        .buy(SUBJECT, Side::Trust, TRADER, units, quote.total_required, &mut custody, 0)
        .expect("funded trader");
    (engine, custody)
}

// ============================================================================
// BENCHMARK: Quote Latency
// ============================================================================
// Quotes are the hot read path: hosts price UI updates through them.

fn bench_quote_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("quote_latency");

    group.measurement_time(Duration::from_secs(10));
    group.sample_size(1000);

    // Benchmark: single-unit quote at the curve's center
    group.bench_function("buy_one_unit_centered", |b| {
        let (engine, _) = setup_engine();
        b.iter(|| black_box(engine.quote_buy(SUBJECT, Side::Trust, black_box(1))));
    });

    // Benchmark: large quote deep into the curve
    group.bench_function("buy_10k_units_skewed", |b| {
        let (engine, _) = setup_traded_engine(5_000);
        b.iter(|| black_box(engine.quote_buy(SUBJECT, Side::Trust, black_box(10_000))));
    });

    // Benchmark: sell quote against an existing position
    group.bench_function("sell_1k_units", |b| {
        let (engine, _) = setup_traded_engine(5_000);
        b.iter(|| black_box(engine.quote_sell(SUBJECT, Side::Trust, black_box(1_000))));
    });

    // Benchmark: marginal price read
    group.bench_function("marginal_price", |b| {
        let (engine, _) = setup_traded_engine(5_000);
        b.iter(|| black_box(engine.marginal_price(SUBJECT, Side::Trust)));
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Execution
// ============================================================================
// Full buy path: affordability search, fee split, custody, settlement.

fn bench_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("execution");

    group.measurement_time(Duration::from_secs(10));

    // Benchmark: buy resolving ~100 units from a budget
    group.bench_function("buy_100_unit_budget", |b| {
        b.iter_batched(
            setup_engine,
            |(mut engine, mut custody)| {
                black_box(engine.buy(
                    SUBJECT,
                    Side::Trust,
                    TRADER,
                    1,
                    51 * SCALE,
                    &mut custody,
                    0,
                ))
            },
            BatchSize::SmallInput,
        );
    });

    // Benchmark: round trip (buy then sell the whole position)
    group.bench_function("buy_then_sell_round_trip", |b| {
        b.iter_batched(
            setup_engine,
            |(mut engine, mut custody)| {
                let receipt = engine
                    .buy(SUBJECT, Side::Trust, TRADER, 1, 51 * SCALE, &mut custody, 0)
                    .expect("funded trader");
                black_box(engine.sell(
                    SUBJECT,
                    Side::Trust,
                    TRADER,
                    receipt.units_bought(),
                    0,
                    &mut custody,
                    1,
                ))
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Throughput
// ============================================================================
// Sustained alternating buys across both sides of one market.

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    group.measurement_time(Duration::from_secs(15));
    group.sample_size(50);

    for batch_size in [100usize, 1_000, 5_000] {
        group.throughput(Throughput::Elements(batch_size as u64));

        group.bench_with_input(
            BenchmarkId::new("alternating_buys", batch_size),
            &batch_size,
            |b, &size| {
                b.iter_batched(
                    setup_engine,
                    |(mut engine, mut custody)| {
                        for i in 0..size {
                            let side = if i % 2 == 0 { Side::Trust } else { Side::Distrust };
                            engine
                                .buy(SUBJECT, side, TRADER, 1, 2 * SCALE, &mut custody, i as u64)
                                .expect("funded trader");
                        }
                        // prevent the loop from being optimized away
                        black_box(engine.total_funds_held())
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: State Root
// ============================================================================
// Hashing cost grows with market count; hosts snapshot roots per block.

fn bench_state_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_root");

    group.measurement_time(Duration::from_secs(5));

    for market_count in [10u64, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("markets", market_count),
            &market_count,
            |b, &count| {
                let mut engine = MarketEngine::new(PROTOCOL);
                let config_id = engine
                    .register_config(MarketConfig::new(SCALE, 1000, 0).expect("valid config"))
                    .expect("first config");
                let mut custody = VaultCustody::new();
                for subject in 0..count {
                    engine
                        .create_market(subject, config_id, TRADER, &AllowAll, &mut custody)
                        .expect("fresh subject");
                }

                b.iter(|| black_box(engine.state_root()));
            },
        );
    }

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(
    benches,
    bench_quote_latency,
    bench_execution,
    bench_throughput,
    bench_state_root
);

criterion_main!(benches);
