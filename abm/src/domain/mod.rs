//! Domain layer: Pure business logic and value objects

mod market_state;
mod reference_curve;
mod reward_ledger;
mod yield_record;

pub use market_state::MarketState;
pub use reference_curve::{LOG_SHAPE_TOLERANCE, LiquidityShape, ReferenceCurve, SATURATION};
pub use reward_ledger::{PendingRevenue, RewardLedger};
pub use yield_record::YieldRecord;
