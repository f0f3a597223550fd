//! Infrastructure layer: Randomness and the exogenous market

mod market_process;
mod random_streams;

pub use market_process::{MarketConfig, MarketProcess, VolatilityRegime};
pub use random_streams::{RandomStreams, StreamRole};
