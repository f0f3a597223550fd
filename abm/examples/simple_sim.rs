//! Simple dealer market run with the reference set-up

use abm::{
    MarketMakerConfig, RewardComponent, SimulationConfig, SimulationEngine, cumulative_series,
    internalization_series, market_share,
};
use dealer_core::MarketMakerId;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Dealer Market Simulation ===\n");

    // Three competing dealers, the last one more risk averse
    let mut config = SimulationConfig::reference(3, 10).with_seed(42);
    config.market_makers[2] = MarketMakerConfig::default().with_risk_aversion(2.0);

    println!("Market makers: {}", config.market_makers.len());
    println!("Investors:     {}", config.investors.len());
    println!("Tiers:         {}", config.num_tiers);
    println!("Steps:         {} x {} min\n", config.num_steps, config.market.step_minutes);

    let seed = config.seed;
    let mut engine = SimulationEngine::initialize(config, seed)?;
    engine.run_to_completion()?;
    let log = engine.finish();

    let first = log.records.first().map(|r| r.mid_price).unwrap_or_default();
    let last = log.records.last().map(|r| r.mid_price).unwrap_or_default();
    let trades: usize = log.records.iter().map(|r| r.trades.len()).sum();

    println!("=== Results ===");
    println!("Mid price:     {:.4} -> {:.4}", first, last);
    println!("Trades:        {}", trades);

    let share = market_share(&log.records);
    println!("\nPer market maker:");
    for (id, share) in &share {
        let total = cumulative_series(&log.records, *id, RewardComponent::Total);
        let internalization = internalization_series(&log.records, *id);
        println!(
            "  {}: share {:.1}%, total reward {:.4}, internalization {:.3}",
            id,
            share * 100.0,
            total.last().copied().unwrap_or_default(),
            internalization.last().copied().unwrap_or_default()
        );
    }

    if let Some(rewards) = log.final_rewards(MarketMakerId(0)) {
        println!("\n{} breakdown:", MarketMakerId(0));
        println!("  spread revenue:   {:.4}", rewards.spread_revenue);
        println!("  position revenue: {:.4}", rewards.position_revenue);
        println!("  hedging cost:     {:.4}", rewards.hedging_cost);
        println!("  risk cost:        {:.4}", rewards.risk_cost);
    }

    for pending in &log.unmatured {
        println!(
            "\n{}: {} pending entries discarded (net volume {:.2})",
            pending.market_maker, pending.entries, pending.net_volume
        );
    }

    // Optional path for the full step log
    if let Some(path) = std::env::args().nth(1) {
        std::fs::write(&path, log.to_json_pretty()?)?;
        println!("\nStep log written to {}", path);
    }

    Ok(())
}
