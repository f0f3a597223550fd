use super::{InvestorId, MarketMakerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    /// Price-taking client
    Investor(InvestorId),
    /// Market maker
    Dealer(MarketMakerId),
    /// The outside exchange (reference liquidity curve)
    Exchange,
}

impl Participant {
    pub fn dealer(&self) -> Option<MarketMakerId> {
        match self {
            Participant::Dealer(id) => Some(*id),
            _ => None,
        }
    }

    pub fn investor(&self) -> Option<InvestorId> {
        match self {
            Participant::Investor(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_dealer(&self, id: MarketMakerId) -> bool {
        self.dealer() == Some(id)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Investor(id) => write!(f, "{}", id),
            Participant::Dealer(id) => write!(f, "{}", id),
            Participant::Exchange => write!(f, "EXCHANGE"),
        }
    }
}
