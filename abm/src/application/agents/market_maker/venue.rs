//! Hedge venues
//!
//! Anything a market maker can offload inventory to: a competing dealer
//! (at its inter-dealer quote) or the outside exchange (at the reference
//! cost curve).

use super::MarketMaker;
use crate::domain::MarketState;
use crate::error::Result;
use dealer_core::Participant;
use serde::{Deserialize, Serialize};

pub trait HedgeVenue {
    /// Counterparty recorded on the hedge trade
    fn participant(&self) -> Participant;

    /// Relative spread this venue charges for `volume`
    fn hedge_quote(&self, market: &MarketState, volume: f64) -> Result<f64>;
}

/// The outside market, priced on the reference curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeVenue;

impl HedgeVenue for ExchangeVenue {
    fn participant(&self) -> Participant {
        Participant::Exchange
    }

    fn hedge_quote(&self, market: &MarketState, volume: f64) -> Result<f64> {
        Ok(market.reference_cost(volume))
    }
}

impl HedgeVenue for MarketMaker {
    fn participant(&self) -> Participant {
        Participant::Dealer(self.id())
    }

    fn hedge_quote(&self, market: &MarketState, volume: f64) -> Result<f64> {
        self.dealer_quote(market, volume)
    }
}
