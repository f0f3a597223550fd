//! Exponential Moving Average

use serde::{Deserialize, Serialize};

/// EMA (Exponential Moving Average) with a fixed sample weight
///
/// EMA formula: new_ema = (1 - weight) * old_ema + weight * value
///
/// The first sample initialises the average directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ema {
    /// Weight of the newest sample (0 < weight <= 1)
    weight: f64,
    /// Current value, `None` until the first update
    value: Option<f64>,
}

impl Ema {
    /// Create EMA with a custom sample weight
    pub fn with_weight(weight: f64) -> Self {
        Self {
            weight: weight.clamp(f64::MIN_POSITIVE, 1.0),
            value: None,
        }
    }

    /// Update EMA with new value
    #[inline]
    pub fn update(&mut self, value: f64) {
        self.value = Some(match self.value {
            None => value,
            Some(old) => (1.0 - self.weight) * old + self.weight * value,
        });
    }

    /// Get current EMA value
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}
