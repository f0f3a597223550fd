//! Agent and trade identifiers
//!
//! Identifiers are small integers assigned in configuration order. The
//! simulation iterates agents in ascending id order, so `Ord` is part of the
//! contract (it is also the tiering tie-break).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Investor identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestorId(pub u32);

impl InvestorId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InvestorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INV_{}", self.0)
    }
}

/// Market maker (dealer) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketMakerId(pub u32);

impl MarketMakerId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MarketMakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MM_{}", self.0)
    }
}

/// Sequential trade identifier, unique within one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(pub u64);

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(InvestorId::new(3).to_string(), "INV_3");
        assert_eq!(MarketMakerId::new(0).to_string(), "MM_0");
        assert_eq!(TradeId(12).to_string(), "T12");
    }

    #[test]
    fn test_ordering_follows_index() {
        let mut ids = vec![InvestorId(4), InvestorId(1), InvestorId(2)];
        ids.sort();
        assert_eq!(ids, vec![InvestorId(1), InvestorId(2), InvestorId(4)]);
        assert_eq!(InvestorId(4).index(), 4);
    }
}
