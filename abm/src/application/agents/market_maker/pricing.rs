//! Tiered spread pricing
//!
//! `quote(v, tier) = S(0)·(S(v)/S(0))^α + δ·tier + markup`, with `S` the
//! reference cost curve. With α >= 1, δ >= 0 and markup >= 0 the quote never
//! undercuts `S(v)`; `quote` still verifies it and refuses to price below.

use super::MarketMakerConfig;
use crate::domain::MarketState;
use crate::error::{ConfigError, Result, SimulationError};
use dealer_core::MarketMakerId;
use log::error;

/// Relative slack for the reference-cost check
const ARBITRAGE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    owner: MarketMakerId,
    alpha: f64,
    tier_penalty: f64,
    markup: f64,
}

impl PricingPolicy {
    pub fn new(owner: MarketMakerId, config: &MarketMakerConfig) -> std::result::Result<Self, ConfigError> {
        let policy = Self {
            owner,
            alpha: config.alpha,
            tier_penalty: config.tier_penalty,
            markup: config.markup,
        };
        policy.validate()?;
        Ok(policy)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        let reason = if !(self.alpha.is_finite() && self.alpha >= 1.0) {
            format!("alpha must be at least 1, got {}", self.alpha)
        } else if !(self.tier_penalty.is_finite() && self.tier_penalty >= 0.0) {
            format!("tier penalty must be non-negative, got {}", self.tier_penalty)
        } else if !(self.markup.is_finite() && self.markup >= 0.0) {
            format!("markup must be non-negative, got {}", self.markup)
        } else {
            return Ok(());
        };

        Err(ConfigError::ArbitrageUnsafePricing {
            market_maker: self.owner,
            reason,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn tier_penalty(&self) -> f64 {
        self.tier_penalty
    }

    pub fn markup(&self) -> f64 {
        self.markup
    }

    /// Tier-independent part of the quote
    pub fn base_spread(&self, market: &MarketState, volume: f64) -> f64 {
        let at_zero = market.reference_cost(0.0);
        let at_volume = market.reference_cost(volume);
        at_zero * (at_volume / at_zero).powf(self.alpha)
    }

    /// Relative spread quoted for `volume` at `tier`
    pub fn quote(&self, market: &MarketState, volume: f64, tier: usize) -> Result<f64> {
        let quote = self.base_spread(market, volume) + self.tier_penalty * tier as f64 + self.markup;
        let reference = market.reference_cost(volume);

        if !(quote >= reference * (1.0 - ARBITRAGE_TOLERANCE)) {
            error!(
                "{} quote {:.6e} below reference cost {:.6e} for volume {} at tier {}",
                self.owner, quote, reference, volume, tier
            );
            return Err(SimulationError::ArbitrageViolation {
                market_maker: self.owner,
                volume,
                tier,
                quote,
                reference,
            });
        }

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReferenceCurve;
    use approx::assert_relative_eq;
    use rand::prelude::*;

    fn market(s0: f64) -> MarketState {
        MarketState {
            step: 1,
            mid_price: 100.0,
            previous_mid: 100.0,
            per_step_volatility: 6.4e-4,
            curve: ReferenceCurve::new(s0, 1.6, 10_000.0).unwrap(),
        }
    }

    fn policy(config: MarketMakerConfig) -> PricingPolicy {
        PricingPolicy::new(MarketMakerId(0), &config).unwrap()
    }

    #[test]
    fn test_zero_volume_tier_zero_is_half_spread() {
        let pricing = policy(MarketMakerConfig::default());
        let state = market(1.5e-4);
        assert_relative_eq!(pricing.quote(&state, 0.0, 0).unwrap(), 0.75e-4, epsilon = 1e-18);
    }

    #[test]
    fn test_tier_penalty_is_additive() {
        let pricing = policy(MarketMakerConfig::default());
        let state = market(1.5e-4);
        let tier0 = pricing.quote(&state, 500.0, 0).unwrap();
        let tier3 = pricing.quote(&state, 500.0, 3).unwrap();
        assert_relative_eq!(tier3 - tier0, 3e-4, epsilon = 1e-15);
    }

    #[test]
    fn test_quote_properties_randomised() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2_000 {
            let config = MarketMakerConfig {
                alpha: rng.gen_range(1.0..4.0),
                tier_penalty: rng.gen_range(0.0..1e-3),
                ..Default::default()
            };
            let pricing = policy(config);
            let state = market(rng.gen_range(2e-5..5e-4));
            let volume = rng.gen_range(0.0..20_000.0);

            let mut previous = 0.0;
            for tier in 0..5 {
                let quote = pricing.quote(&state, volume, tier).unwrap();
                assert!(quote >= state.reference_cost(volume) * (1.0 - 1e-12));
                assert!(quote >= previous);
                previous = quote;
            }
        }
    }

    #[test]
    fn test_unsafe_configs_rejected() {
        for config in [
            MarketMakerConfig { alpha: 0.9, ..Default::default() },
            MarketMakerConfig { tier_penalty: -1e-4, ..Default::default() },
            MarketMakerConfig { markup: -1.0, ..Default::default() },
        ] {
            assert!(matches!(
                PricingPolicy::new(MarketMakerId(2), &config),
                Err(ConfigError::ArbitrageUnsafePricing { market_maker: MarketMakerId(2), .. })
            ));
        }
    }

    #[test]
    fn test_runtime_check_refuses_to_clamp() {
        let unsafe_policy = PricingPolicy {
            owner: MarketMakerId(1),
            alpha: 0.5,
            tier_penalty: 0.0,
            markup: 0.0,
        };
        let err = unsafe_policy.quote(&market(1.5e-4), 5_000.0, 0).unwrap_err();
        assert!(matches!(err, SimulationError::ArbitrageViolation { market_maker: MarketMakerId(1), .. }));
    }
}
