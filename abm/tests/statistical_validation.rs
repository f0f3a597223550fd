//! Statistical validation of the random inputs
//!
//! The price path, reference spread and investor draws should match their
//! configured distributions within sampling tolerance.

use abm::{
    DirectionStrategy, Investor, InvestorConfig, MarketConfig, MarketProcess, RandomStreams,
    VolatilityRegime,
};
use dealer_core::{InvestorId, Side};

const N_SAMPLES: usize = 5000;
const SEED: u64 = 42;

/// Compute mean of a slice
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compute standard deviation of a slice
fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[test]
fn test_log_returns_match_volatility() {
    let config = MarketConfig::default().with_regime(VolatilityRegime::High);
    let expected_std = config.per_step_volatility();
    let mut market = MarketProcess::new(config, &RandomStreams::new(SEED)).unwrap();

    let returns: Vec<f64> = (0..N_SAMPLES)
        .map(|_| {
            let state = market.advance();
            (state.mid_price / state.previous_mid).ln()
        })
        .collect();

    let actual_std = std_dev(&returns);
    let relative_error = (actual_std - expected_std).abs() / expected_std;
    assert!(
        relative_error < 0.05,
        "Return std {:.3e} differs from σ√Δt {:.3e} by {:.1}%",
        actual_std,
        expected_std,
        relative_error * 100.0
    );

    // Drift is negligible at this horizon; the mean sits within a few standard errors of zero
    let standard_error = expected_std / (N_SAMPLES as f64).sqrt();
    assert!(mean(&returns).abs() < 5.0 * standard_error);
}

#[test]
fn test_reference_spread_distribution() {
    let config = MarketConfig::default();
    let mut market = MarketProcess::new(config.clone(), &RandomStreams::new(SEED)).unwrap();

    let spreads: Vec<f64> = (0..N_SAMPLES).map(|_| market.advance().reference_spread()).collect();

    assert!(spreads.iter().all(|s| (config.spread_min..=config.spread_max).contains(s)));

    let relative_error = (mean(&spreads) - config.spread_mean).abs() / config.spread_mean;
    assert!(
        relative_error < 0.05,
        "Spread mean {:.3e} differs from target {:.3e}",
        mean(&spreads),
        config.spread_mean
    );

    let actual_std = std_dev(&spreads);
    assert!(actual_std > 0.8 * config.spread_std && actual_std < 1.1 * config.spread_std);
}

#[test]
fn test_investor_arrival_and_size() {
    let config = InvestorConfig::reference(5, 10);
    let mut investor = Investor::new(InvestorId(5), config, &RandomStreams::new(SEED)).unwrap();

    let mut log_sizes = Vec::new();
    let mut buys = 0usize;
    for _ in 0..N_SAMPLES {
        if let Some(request) = investor.draw_request(|| 0.0) {
            log_sizes.push(request.volume.ln());
            if request.side == Side::Buy {
                buys += 1;
            }
        }
    }

    let arrival_rate = log_sizes.len() as f64 / N_SAMPLES as f64;
    assert!((arrival_rate - 0.5).abs() < 0.03, "arrival rate {arrival_rate}");

    // mu = 0.5 + 0.5 * 4
    assert!((mean(&log_sizes) - 2.5).abs() < 0.05);
    assert!((std_dev(&log_sizes) - 0.5).abs() < 0.03);

    let buy_rate = buys as f64 / log_sizes.len() as f64;
    assert!((buy_rate - 0.5).abs() < 0.04, "buy rate {buy_rate}");
}

#[test]
fn test_partially_skilled_investor() {
    let config = InvestorConfig::reference(0, 1)
        .with_arrival_probability(1.0)
        .with_direction(DirectionStrategy::Informed {
            buy_probability: 0.5,
            skill_probability: 0.5,
        });
    let mut investor = Investor::new(InvestorId(0), config, &RandomStreams::new(SEED)).unwrap();

    // Price always rises: skilled draws buy, the rest split evenly
    let buys = (0..N_SAMPLES)
        .filter_map(|_| investor.draw_request(|| 1.0))
        .filter(|request| request.side == Side::Buy)
        .count();
    let buy_rate = buys as f64 / N_SAMPLES as f64;
    assert!((buy_rate - 0.75).abs() < 0.03, "buy rate {buy_rate}");
}
