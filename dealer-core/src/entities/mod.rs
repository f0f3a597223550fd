mod rewards;
mod trade;

pub use rewards::RewardComponents;
pub use trade::{Trade, TradeKind};
