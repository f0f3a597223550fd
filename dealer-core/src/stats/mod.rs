//! Floating-point running statistics
//!
//! The dealer simulation works in relative spreads and real-valued volumes,
//! so unlike the order-routing code these estimators use `f64` directly.

mod ema;
mod mean;

pub use ema::Ema;
pub use mean::RunningMean;
