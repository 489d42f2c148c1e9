//! trustcurve - Binary Entry Point
//!
//! Walks one market through creation, a buy on each side, and a sell,
//! printing prices and ledger totals along the way.

use trustcurve::engine::MarketEngine;
use trustcurve::ledger::{AllowAll, VaultCustody};
use trustcurve::types::fixed::{from_fixed, to_fixed};
use trustcurve::types::{FeeConfig, MarketConfig, Side};

fn main() {
    println!("===========================================");
    println!("  trustcurve - reputation market demo");
    println!("===========================================");
    println!();

    let protocol: u64 = 1;
    let alice: u64 = 100;
    let bob: u64 = 101;
    let subject: u64 = 7;

    let mut engine = MarketEngine::new(protocol);
    let config = MarketConfig::new(
        to_fixed("1.0").expect("valid literal"),
        1000,
        to_fixed("5.0").expect("valid literal"),
    )
    .expect("valid config");
    let config_id = engine.register_config(config).expect("first config");
    engine
        .set_fee_config(FeeConfig::new(100, 100, 50).expect("fees under cap"))
        .expect("validated fees");

    let mut custody = VaultCustody::new();
    custody.fund(alice, to_fixed("10000.0").expect("valid literal"));
    custody.fund(bob, to_fixed("10000.0").expect("valid literal"));

    println!("Creating market for subject {}...", subject);
    engine
        .create_market(subject, config_id, alice, &AllowAll, &mut custody)
        .expect("fresh subject");
    let market = engine.market(subject).expect("just created");
    println!("  trust votes:    {}", market.trust_votes);
    println!("  distrust votes: {}", market.distrust_votes);
    println!(
        "  trust price:    {}",
        from_fixed(engine.marginal_price(subject, Side::Trust).expect("market exists"))
    );
    println!();

    println!("Alice buys trust with up to 100.0 funds...");
    let receipt = engine
        .buy(
            subject,
            Side::Trust,
            alice,
            1,
            to_fixed("100.0").expect("valid literal"),
            &mut custody,
            1,
        )
        .expect("funded buyer");
    println!("  units bought:  {}", receipt.units_bought());
    println!("  gross cost:    {}", from_fixed(receipt.quote.gross_cost));
    println!("  protocol fee:  {}", from_fixed(receipt.quote.protocol_fee));
    println!("  donation:      {}", from_fixed(receipt.quote.donation));
    println!("  total paid:    {}", from_fixed(receipt.funds_paid()));
    println!("  new price:     {}", from_fixed(receipt.quote.new_price));
    println!();

    println!("Bob buys distrust with up to 100.0 funds...");
    let receipt = engine
        .buy(
            subject,
            Side::Distrust,
            bob,
            1,
            to_fixed("100.0").expect("valid literal"),
            &mut custody,
            2,
        )
        .expect("funded buyer");
    println!("  units bought:  {}", receipt.units_bought());
    println!("  total paid:    {}", from_fixed(receipt.funds_paid()));
    println!();

    println!("Alice sells half her trust position...");
    let held = engine.position(alice, subject).trust;
    let receipt = engine
        .sell(subject, Side::Trust, alice, held / 2, 0, &mut custody, 3)
        .expect("held position");
    println!("  units sold:    {}", receipt.quote.units);
    println!("  net proceeds:  {}", from_fixed(receipt.proceeds()));
    println!();

    println!("Ledger totals:");
    println!("  funds held:    {}", from_fixed(engine.total_funds_held()));
    println!("  escrowed:      {}", from_fixed(engine.total_escrowed()));
    println!("  vault total:   {}", from_fixed(custody.vault_total()));
    println!("  participants:  {}", engine.participant_count(subject));
    println!("  state root:    {}", engine.state_root_hex());
    println!();

    // funds reconciliation: the vault holds exactly what the ledgers claim
    assert_eq!(
        custody.vault_total(),
        engine.total_funds_held() + engine.total_escrowed()
    );
    println!("Vault reconciles with engine ledgers.");
}
