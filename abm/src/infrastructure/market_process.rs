//! Exogenous market process
//!
//! Geometric Brownian motion for the mid-price plus an i.i.d. clamped
//! normal reference spread. Price and spread draw from their own streams.

use super::{RandomStreams, StreamRole};
use crate::domain::{MarketState, ReferenceCurve};
use crate::error::ConfigError;
use rand::prelude::*;
use rand_distr::{Normal, StandardNormal};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Which annualised volatility drives the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityRegime {
    #[default]
    Low,
    High,
}

/// Configuration for the market process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Initial mid-price (default: 100)
    pub start_price: f64,
    /// Step length in minutes (default: 15)
    pub step_minutes: f64,
    pub minutes_per_day: f64,
    pub trading_days_per_year: f64,
    /// Annualised drift μ
    pub drift: f64,
    /// Annualised σ in the low regime (default: 10%)
    pub volatility_low: f64,
    /// Annualised σ in the high regime (default: 30%)
    pub volatility_high: f64,
    pub regime: VolatilityRegime,
    /// Reference spread s0 ~ N(mean, std), clamped to [min, max]
    pub spread_mean: f64,
    pub spread_std: f64,
    pub spread_min: f64,
    pub spread_max: f64,
    /// λ of the outside liquidity curve
    pub liquidity_shape: f64,
    /// V_max of the outside liquidity curve
    pub max_liquidity: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            step_minutes: 15.0,
            minutes_per_day: 1440.0,
            trading_days_per_year: 252.0,
            drift: 0.0,
            volatility_low: 0.10,
            volatility_high: 0.30,
            regime: VolatilityRegime::Low,
            spread_mean: 1.5e-4,
            spread_std: 0.5e-4,
            spread_min: 2e-5,
            spread_max: 5e-4,
            liquidity_shape: 1.6,
            max_liquidity: 10_000.0,
        }
    }
}

impl MarketConfig {
    pub fn with_regime(mut self, regime: VolatilityRegime) -> Self {
        self.regime = regime;
        self
    }

    /// Zero drift and zero volatility: the mid-price never moves
    pub fn frozen(mut self) -> Self {
        self.drift = 0.0;
        self.volatility_low = 0.0;
        self.volatility_high = 0.0;
        self
    }

    /// Annualised σ of the configured regime
    pub fn volatility(&self) -> f64 {
        match self.regime {
            VolatilityRegime::Low => self.volatility_low,
            VolatilityRegime::High => self.volatility_high,
        }
    }

    /// Step length in years
    pub fn dt_years(&self) -> f64 {
        self.step_minutes / (self.minutes_per_day * self.trading_days_per_year)
    }

    /// σ·√Δt
    pub fn per_step_volatility(&self) -> f64 {
        self.volatility() * self.dt_years().sqrt()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.start_price.is_finite() && self.start_price > 0.0) {
            return Err(ConfigError::invalid("start_price", format!("must be positive, got {}", self.start_price)));
        }
        for (name, value) in [
            ("step_minutes", self.step_minutes),
            ("minutes_per_day", self.minutes_per_day),
            ("trading_days_per_year", self.trading_days_per_year),
            ("max_liquidity", self.max_liquidity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(name, format!("must be positive, got {value}")));
            }
        }
        if !self.drift.is_finite() {
            return Err(ConfigError::invalid("drift", "must be finite"));
        }
        for sigma in [self.volatility_low, self.volatility_high] {
            if !(sigma.is_finite() && sigma >= 0.0) {
                return Err(ConfigError::NegativeVolatility(sigma));
            }
        }

        if !(self.spread_min.is_finite() && self.spread_min > 0.0) {
            return Err(ConfigError::InvalidSpreadBand(format!(
                "minimum must be positive, got {}",
                self.spread_min
            )));
        }
        if !(self.spread_max.is_finite() && self.spread_max >= self.spread_min) {
            return Err(ConfigError::InvalidSpreadBand(format!(
                "maximum {} below minimum {}",
                self.spread_max, self.spread_min
            )));
        }
        if !(self.spread_mean.is_finite() && self.spread_std.is_finite() && self.spread_std >= 0.0) {
            return Err(ConfigError::InvalidSpreadBand(format!(
                "distribution N({}, {}) is not valid",
                self.spread_mean, self.spread_std
            )));
        }

        ReferenceCurve::new(self.spread_min, self.liquidity_shape, self.max_liquidity)?;
        Ok(())
    }
}

/// Mid-price and reference-spread generator
#[derive(Debug, Clone)]
pub struct MarketProcess {
    config: MarketConfig,
    price_rng: StdRng,
    spread_rng: StdRng,
    spread_dist: Normal<f64>,
    /// Shocks drawn ahead of time by `future_mid`, consumed in order
    shocks: VecDeque<f64>,
    state: MarketState,
}

impl MarketProcess {
    pub fn new(config: MarketConfig, streams: &RandomStreams) -> Result<Self, ConfigError> {
        config.validate()?;

        let spread_dist = Normal::new(config.spread_mean, config.spread_std)
            .map_err(|e| ConfigError::InvalidSpreadBand(e.to_string()))?;
        let mut spread_rng = streams.stream(StreamRole::MarketSpread, 0);
        let reference_spread = spread_dist
            .sample(&mut spread_rng)
            .clamp(config.spread_min, config.spread_max);
        let curve = ReferenceCurve::new(reference_spread, config.liquidity_shape, config.max_liquidity)?;

        let state = MarketState {
            step: 0,
            mid_price: config.start_price,
            previous_mid: config.start_price,
            per_step_volatility: config.per_step_volatility(),
            curve,
        };

        Ok(Self {
            price_rng: streams.stream(StreamRole::MarketPrice, 0),
            spread_rng,
            spread_dist,
            shocks: VecDeque::new(),
            state,
            config,
        })
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn state(&self) -> MarketState {
        self.state
    }

    pub fn mid_price(&self) -> f64 {
        self.state.mid_price
    }

    pub fn reference_spread(&self) -> f64 {
        self.state.reference_spread()
    }

    pub fn reference_cost(&self, volume: f64) -> f64 {
        self.state.reference_cost(volume)
    }

    pub fn per_step_volatility(&self) -> f64 {
        self.state.per_step_volatility
    }

    /// Move one step: new mid-price, new reference spread
    pub fn advance(&mut self) -> MarketState {
        let shock = match self.shocks.pop_front() {
            Some(shock) => shock,
            None => self.price_rng.sample(StandardNormal),
        };

        let previous = self.state.mid_price;
        let reference_spread = self
            .spread_dist
            .sample(&mut self.spread_rng)
            .clamp(self.config.spread_min, self.config.spread_max);

        self.state = MarketState {
            step: self.state.step + 1,
            mid_price: self.evolve(previous, shock),
            previous_mid: previous,
            per_step_volatility: self.state.per_step_volatility,
            curve: self.state.curve.with_reference_spread(reference_spread),
        };
        self.state
    }

    /// Mid-price `horizon` steps ahead on the path `advance` will follow
    pub fn future_mid(&mut self, horizon: usize) -> f64 {
        while self.shocks.len() < horizon {
            let shock = self.price_rng.sample(StandardNormal);
            self.shocks.push_back(shock);
        }
        self.shocks
            .iter()
            .take(horizon)
            .fold(self.state.mid_price, |price, &shock| self.evolve(price, shock))
    }

    fn evolve(&self, price: f64, shock: f64) -> f64 {
        let sigma = self.config.volatility();
        let dt = self.config.dt_years();
        let drift = (self.config.drift - 0.5 * sigma * sigma) * dt;
        price * (drift + sigma * dt.sqrt() * shock).exp()
    }
}
