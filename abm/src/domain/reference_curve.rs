//! Reference liquidity-cost curve
//!
//! Cost (relative half-spread) of trading `v` immediately against the outside
//! order book, for a book whose depth profile decays with shape `λ`:
//!
//! ```text
//! S_ref(v) = (s0 / 2) · f(ṽ),  ṽ = |v| / V_max
//!
//! λ = 2:  f(ṽ) = -ln(1 - ṽ) / ṽ
//! λ ≠ 2:  f(ṽ) = (ω / ṽ) · (1 - (1 - ṽ)^(1/ω)),  ω = (λ - 1) / (λ - 2)
//! ```
//!
//! `f(0) = 1`, and `f` is strictly increasing for every `λ > 1`. Past
//! `ṽ = 0.999` the book is exhausted; the curve continues linearly with its
//! slope at that point so that it stays finite and increasing.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// λ within this distance of 2 selects the logarithmic form
pub const LOG_SHAPE_TOLERANCE: f64 = 1e-9;

/// Normalised volume beyond which the curve is extrapolated linearly
pub const SATURATION: f64 = 0.999;

/// Closed form selected from λ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum LiquidityShape {
    Logarithmic,
    PowerLaw { omega: f64 },
}

impl LiquidityShape {
    pub fn from_lambda(lambda: f64) -> Result<Self, ConfigError> {
        if !lambda.is_finite() || lambda <= 1.0 {
            return Err(ConfigError::DegenerateLiquidityShape(lambda));
        }
        if (lambda - 2.0).abs() <= LOG_SHAPE_TOLERANCE {
            Ok(LiquidityShape::Logarithmic)
        } else {
            Ok(LiquidityShape::PowerLaw {
                omega: (lambda - 1.0) / (lambda - 2.0),
            })
        }
    }

    /// f(ṽ) for ṽ in [0, 1)
    fn factor(&self, x: f64) -> f64 {
        if x == 0.0 {
            return 1.0;
        }
        let log_remaining = (-x).ln_1p();
        match *self {
            LiquidityShape::Logarithmic => -log_remaining / x,
            LiquidityShape::PowerLaw { omega } => omega * -(log_remaining / omega).exp_m1() / x,
        }
    }

    /// f'(ṽ) for ṽ in (0, 1)
    fn slope(&self, x: f64) -> f64 {
        let log_remaining = (-x).ln_1p();
        match *self {
            LiquidityShape::Logarithmic => (x / (1.0 - x) + log_remaining) / (x * x),
            LiquidityShape::PowerLaw { omega } => {
                let g = -(log_remaining / omega).exp_m1();
                let dg = ((1.0 / omega - 1.0) * log_remaining).exp() / omega;
                omega * (dg * x - g) / (x * x)
            }
        }
    }
}

/// Reference cost curve for the current reference spread
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCurve {
    reference_spread: f64,
    lambda: f64,
    shape: LiquidityShape,
    max_liquidity: f64,
}

impl ReferenceCurve {
    pub fn new(reference_spread: f64, lambda: f64, max_liquidity: f64) -> Result<Self, ConfigError> {
        let shape = LiquidityShape::from_lambda(lambda)?;
        if !(max_liquidity.is_finite() && max_liquidity > 0.0) {
            return Err(ConfigError::invalid(
                "max_liquidity",
                format!("must be positive, got {}", max_liquidity),
            ));
        }
        if !(reference_spread.is_finite() && reference_spread > 0.0) {
            return Err(ConfigError::InvalidSpreadBand(format!(
                "reference spread must be positive, got {}",
                reference_spread
            )));
        }
        Ok(Self {
            reference_spread,
            lambda,
            shape,
            max_liquidity,
        })
    }

    /// Same book shape with a new reference spread
    pub fn with_reference_spread(&self, reference_spread: f64) -> Self {
        Self {
            reference_spread,
            ..*self
        }
    }

    #[inline]
    pub fn reference_spread(&self) -> f64 {
        self.reference_spread
    }

    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    #[inline]
    pub fn shape(&self) -> LiquidityShape {
        self.shape
    }

    #[inline]
    pub fn max_liquidity(&self) -> f64 {
        self.max_liquidity
    }

    /// Shape factor f(|v| / V_max)
    pub fn shape_factor(&self, volume: f64) -> f64 {
        let x = volume.abs() / self.max_liquidity;
        if x <= SATURATION {
            self.shape.factor(x)
        } else {
            self.shape.factor(SATURATION) + self.shape.slope(SATURATION) * (x - SATURATION)
        }
    }

    /// S_ref(v): relative cost of trading `volume` (sign ignored)
    pub fn cost(&self, volume: f64) -> f64 {
        0.5 * self.reference_spread * self.shape_factor(volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve(lambda: f64) -> ReferenceCurve {
        ReferenceCurve::new(1.5e-4, lambda, 10_000.0).unwrap()
    }

    #[test]
    fn test_zero_volume_is_half_spread() {
        for lambda in [1.2, 1.6, 2.0, 3.0, 10.0] {
            assert_eq!(curve(lambda).cost(0.0), 0.75e-4);
        }
    }

    #[test]
    fn test_strictly_increasing_in_volume() {
        for lambda in [1.6, 2.0, 2.5] {
            let c = curve(lambda);
            let mut previous = c.cost(0.0);
            let mut volume = 1e-3;
            while volume < 50_000.0 {
                let current = c.cost(volume);
                assert!(
                    current > previous,
                    "not increasing at v={} for lambda={}",
                    volume,
                    lambda
                );
                previous = current;
                volume *= 1.5;
            }
        }
    }

    #[test]
    fn test_symmetric_in_sign() {
        let c = curve(1.6);
        assert_eq!(c.cost(-250.0), c.cost(250.0));
    }

    #[test]
    fn test_log_and_power_forms_agree_near_two() {
        let log = curve(2.0);
        assert_eq!(log.shape(), LiquidityShape::Logarithmic);

        for lambda in [2.0 - 1e-6, 2.0 + 1e-6] {
            let power = curve(lambda);
            assert!(matches!(power.shape(), LiquidityShape::PowerLaw { .. }));
            for volume in [1.0, 100.0, 2_500.0, 9_000.0] {
                assert_relative_eq!(power.cost(volume), log.cost(volume), max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn test_continuous_at_saturation() {
        let c = curve(1.6);
        let cap = SATURATION * c.max_liquidity();
        assert_relative_eq!(c.cost(cap - 1e-6), c.cost(cap + 1e-6), max_relative = 1e-6);
        assert!(c.cost(2.0 * c.max_liquidity()).is_finite());
    }

    #[test]
    fn test_degenerate_shapes_rejected() {
        for lambda in [1.0, 0.5, -2.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                LiquidityShape::from_lambda(lambda),
                Err(ConfigError::DegenerateLiquidityShape(_))
            ));
        }
    }

    #[test]
    fn test_with_reference_spread_keeps_shape() {
        let c = curve(1.6).with_reference_spread(3e-4);
        assert_eq!(c.reference_spread(), 3e-4);
        assert_eq!(c.cost(0.0), 1.5e-4);
        assert_eq!(c.lambda(), 1.6);
    }
}
