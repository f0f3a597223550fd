//! Investor Agent
//!
//! Price-taking client. Each step it may fire one trade request; the engine
//! routes the request to the market maker with the best quote.
//!
//! Arrival, size and direction each draw from their own stream.

use crate::error::ConfigError;
use crate::infrastructure::{RandomStreams, StreamRole};
use dealer_core::{InvestorId, Side};
use rand::prelude::*;
use rand_distr::LogNormal;
use serde::{Deserialize, Serialize};

/// Distribution of requested volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SizeDistribution {
    /// exp(N(mu, sigma))
    LogNormal { mu: f64, sigma: f64 },
    Fixed { volume: f64 },
}

/// How the investor picks a side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectionStrategy {
    /// Buy with `buy_probability`, sell otherwise
    Random { buy_probability: f64 },
    /// With `skill_probability` trade in the direction of the next price
    /// move, otherwise fall back to `buy_probability`
    Informed {
        buy_probability: f64,
        skill_probability: f64,
    },
}

/// Configuration for one investor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestorConfig {
    /// Probability of requesting a trade each step
    pub arrival_probability: f64,
    pub size: SizeDistribution,
    pub direction: DirectionStrategy,
}

impl InvestorConfig {
    /// Investor `index` of `count`: log-size mean grows from 0.5 to 4.5
    pub fn reference(index: usize, count: usize) -> Self {
        let count = count.max(1) as f64;
        Self {
            arrival_probability: 0.5,
            size: SizeDistribution::LogNormal {
                mu: 0.5 + (index as f64 / count) * 4.0,
                sigma: 0.5,
            },
            direction: DirectionStrategy::Random { buy_probability: 0.5 },
        }
    }

    /// Set arrival probability (builder pattern)
    pub fn with_arrival_probability(mut self, probability: f64) -> Self {
        self.arrival_probability = probability;
        self
    }

    /// Trade a constant volume (builder pattern)
    pub fn with_fixed_size(mut self, volume: f64) -> Self {
        self.size = SizeDistribution::Fixed { volume };
        self
    }

    /// Set direction strategy (builder pattern)
    pub fn with_direction(mut self, direction: DirectionStrategy) -> Self {
        self.direction = direction;
        self
    }

    /// Trade in the direction of the next price move every time
    pub fn informed(self) -> Self {
        self.with_direction(DirectionStrategy::Informed {
            buy_probability: 0.5,
            skill_probability: 1.0,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability("arrival_probability", self.arrival_probability)?;

        match self.size {
            SizeDistribution::LogNormal { mu, sigma } => {
                if !mu.is_finite() {
                    return Err(ConfigError::invalid("size.mu", "must be finite"));
                }
                if !(sigma.is_finite() && sigma >= 0.0) {
                    return Err(ConfigError::invalid(
                        "size.sigma",
                        format!("must be non-negative, got {sigma}"),
                    ));
                }
            }
            SizeDistribution::Fixed { volume } => {
                if !(volume.is_finite() && volume > 0.0) {
                    return Err(ConfigError::invalid(
                        "size.volume",
                        format!("must be positive, got {volume}"),
                    ));
                }
            }
        }

        match self.direction {
            DirectionStrategy::Random { buy_probability } => {
                ConfigError::check_probability("buy_probability", buy_probability)
            }
            DirectionStrategy::Informed {
                buy_probability,
                skill_probability,
            } => {
                ConfigError::check_probability("buy_probability", buy_probability)?;
                ConfigError::check_probability("skill_probability", skill_probability)
            }
        }
    }
}

/// Ephemeral request produced when an investor fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeRequest {
    pub investor: InvestorId,
    /// Requested volume (> 0)
    pub volume: f64,
    pub side: Side,
}

impl TradeRequest {
    /// Volume signed from the investor's perspective
    pub fn signed_volume(&self) -> f64 {
        self.side.sign() * self.volume
    }
}

#[derive(Debug, Clone)]
enum SizeSampler {
    LogNormal(LogNormal<f64>),
    Fixed(f64),
}

/// Investor agent
#[derive(Debug, Clone)]
pub struct Investor {
    id: InvestorId,
    config: InvestorConfig,
    size: SizeSampler,
    arrival_rng: StdRng,
    size_rng: StdRng,
    direction_rng: StdRng,
}

impl Investor {
    pub fn new(
        id: InvestorId,
        config: InvestorConfig,
        streams: &RandomStreams,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let size = match config.size {
            SizeDistribution::LogNormal { mu, sigma } => SizeSampler::LogNormal(
                LogNormal::new(mu, sigma).map_err(|e| ConfigError::invalid("size", e.to_string()))?,
            ),
            SizeDistribution::Fixed { volume } => SizeSampler::Fixed(volume),
        };

        let agent = u64::from(id.0);
        Ok(Self {
            id,
            config,
            size,
            arrival_rng: streams.stream(StreamRole::InvestorArrival, agent),
            size_rng: streams.stream(StreamRole::InvestorSize, agent),
            direction_rng: streams.stream(StreamRole::InvestorDirection, agent),
        })
    }

    pub fn id(&self) -> InvestorId {
        self.id
    }

    pub fn config(&self) -> &InvestorConfig {
        &self.config
    }

    /// Draw this step's request, if the investor fires
    ///
    /// `price_move` is the upcoming mid-price change; it is only evaluated
    /// for an informed draw.
    pub fn draw_request(&mut self, price_move: impl FnOnce() -> f64) -> Option<TradeRequest> {
        if self.arrival_rng.r#gen::<f64>() >= self.config.arrival_probability {
            return None;
        }

        let volume = match &self.size {
            SizeSampler::LogNormal(dist) => dist.sample(&mut self.size_rng),
            SizeSampler::Fixed(volume) => *volume,
        };
        if !(volume.is_finite() && volume > 0.0) {
            return None;
        }

        let side = match self.config.direction {
            DirectionStrategy::Random { buy_probability } => self.random_side(buy_probability),
            DirectionStrategy::Informed {
                buy_probability,
                skill_probability,
            } => {
                if self.direction_rng.gen_bool(skill_probability) {
                    let delta = price_move();
                    if delta > 0.0 {
                        Side::Buy
                    } else if delta < 0.0 {
                        Side::Sell
                    } else {
                        self.random_side(buy_probability)
                    }
                } else {
                    self.random_side(buy_probability)
                }
            }
        };

        Some(TradeRequest {
            investor: self.id,
            volume,
            side,
        })
    }

    fn random_side(&mut self, buy_probability: f64) -> Side {
        if self.direction_rng.gen_bool(buy_probability) {
            Side::Buy
        } else {
            Side::Sell
        }
    }
}
