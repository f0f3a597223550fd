//! Simulation Configuration
//!
//! Loaded from JSON (`from_json` / `from_file`) or built in code starting
//! from [`SimulationConfig::reference`]. Every field has a default, so a
//! config file only needs the values it changes.

use crate::application::agents::{InvestorConfig, MarketMakerConfig};
use crate::error::ConfigError;
use crate::infrastructure::MarketConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How equal best quotes are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Uniformly at random from the matching stream
    #[default]
    Random,
    LowestId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Steps per run (default: 96, one day of 15-minute steps)
    pub num_steps: u64,
    pub market: MarketConfig,
    /// One entry per investor; ids follow the order
    pub investors: Vec<InvestorConfig>,
    /// One entry per market maker; ids follow the order
    pub market_makers: Vec<MarketMakerConfig>,
    /// Number of client tiers K
    pub num_tiers: usize,
    /// Weight β of the newest yield observation
    pub yield_ema_weight: f64,
    /// Steps H before position revenue is recognised
    pub revenue_delay: u64,
    /// Tier used for inter-dealer quotes (default: each dealer's default tier)
    pub interdealer_tier: Option<usize>,
    pub tie_break: TieBreak,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::reference(2, 10)
    }
}

impl SimulationConfig {
    /// Reference set-up with `num_market_makers` identical dealers and
    /// `num_investors` investors of increasing typical size
    pub fn reference(num_market_makers: usize, num_investors: usize) -> Self {
        Self {
            num_steps: 96,
            market: MarketConfig::default(),
            investors: (0..num_investors)
                .map(|i| InvestorConfig::reference(i, num_investors))
                .collect(),
            market_makers: vec![MarketMakerConfig::default(); num_market_makers],
            num_tiers: 5.min(num_investors.max(1)),
            yield_ema_weight: 0.1,
            revenue_delay: 4,
            interdealer_tier: None,
            tie_break: TieBreak::Random,
            seed: 42,
        }
    }

    /// Set number of steps (builder pattern)
    pub fn with_steps(mut self, num_steps: u64) -> Self {
        self.num_steps = num_steps;
        self
    }

    /// Set seed (builder pattern)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set number of tiers (builder pattern)
    pub fn with_tiers(mut self, num_tiers: usize) -> Self {
        self.num_tiers = num_tiers;
        self
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market_makers.is_empty() {
            return Err(ConfigError::NoMarketMakers);
        }
        if self.investors.is_empty() {
            return Err(ConfigError::NoInvestors);
        }
        if self.num_tiers == 0 {
            return Err(ConfigError::ZeroTiers);
        }
        if self.num_tiers > self.investors.len() {
            return Err(ConfigError::TierCountExceedsInvestors {
                tiers: self.num_tiers,
                investors: self.investors.len(),
            });
        }
        if !(self.yield_ema_weight > 0.0 && self.yield_ema_weight <= 1.0) {
            return Err(ConfigError::invalid(
                "yield_ema_weight",
                format!("must be in (0, 1], got {}", self.yield_ema_weight),
            ));
        }
        if let Some(tier) = self.interdealer_tier.filter(|&tier| tier >= self.num_tiers) {
            return Err(ConfigError::invalid(
                "interdealer_tier",
                format!("tier {tier} out of range for {} tiers", self.num_tiers),
            ));
        }

        self.market.validate()?;
        for investor in &self.investors {
            investor.validate()?;
        }
        for market_maker in &self.market_makers {
            market_maker.validate()?;
            market_maker.default_tier.validate(self.num_tiers)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::agents::DefaultTier;

    #[test]
    fn test_reference_config_is_valid() {
        let config = SimulationConfig::reference(3, 10);
        assert!(config.validate().is_ok());
        assert_eq!(config.num_steps, 96);
        assert_eq!(config.num_tiers, 5);
        assert_eq!(config.revenue_delay, 4);
        assert_eq!(config.market_makers.len(), 3);
        assert_eq!(config.investors.len(), 10);

        // Fewer investors than the usual five tiers
        assert_eq!(SimulationConfig::reference(2, 3).num_tiers, 3);
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            SimulationConfig::reference(0, 10).validate(),
            Err(ConfigError::NoMarketMakers)
        ));
        assert!(matches!(
            SimulationConfig::reference(2, 0).validate(),
            Err(ConfigError::NoInvestors)
        ));
        assert!(matches!(
            SimulationConfig::reference(2, 10).with_tiers(0).validate(),
            Err(ConfigError::ZeroTiers)
        ));
        assert!(matches!(
            SimulationConfig::reference(2, 3).with_tiers(4).validate(),
            Err(ConfigError::TierCountExceedsInvestors { tiers: 4, investors: 3 })
        ));
    }

    #[test]
    fn test_fixed_default_tier_out_of_range() {
        let mut config = SimulationConfig::reference(2, 10);
        config.market_makers[1] = MarketMakerConfig::default().with_default_tier(DefaultTier::Fixed(4));
        assert!(config.validate().is_ok());

        config.market_makers[1] = MarketMakerConfig::default().with_default_tier(DefaultTier::Fixed(5));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "default_tier", .. })
        ));
    }

    #[test]
    fn test_from_json_with_defaults() {
        let json = r#"{
            "num_steps": 10,
            "investors": [
                {"arrival_probability": 1.0,
                 "size": {"kind": "fixed", "volume": 100.0},
                 "direction": {"kind": "random", "buy_probability": 1.0}}
            ],
            "market_makers": [{}, {"markup": 1.0}],
            "num_tiers": 1,
            "tie_break": "lowest_id"
        }"#;

        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.num_steps, 10);
        assert_eq!(config.market_makers[1].markup, 1.0);
        assert_eq!(config.market_makers[0].alpha, 1.5);
        assert_eq!(config.tie_break, TieBreak::LowestId);
        assert_eq!(config.market.start_price, 100.0);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(SimulationConfig::from_json("{not json"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            SimulationConfig::from_json(r#"{"market_makers": []}"#),
            Err(ConfigError::NoMarketMakers)
        ));
        assert!(matches!(
            SimulationConfig::from_file("/nonexistent/dealer-market.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
