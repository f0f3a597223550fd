mod ids;
mod participant;
mod side;

pub use ids::{InvestorId, MarketMakerId, TradeId};
pub use participant::Participant;
pub use side::Side;
