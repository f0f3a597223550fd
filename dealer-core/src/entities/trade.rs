use crate::value_objects::{InvestorId, MarketMakerId, Participant, Side, TradeId};
use serde::{Deserialize, Serialize};

/// Client flow versus inter-dealer hedging flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeKind {
    /// Investor trading against a market maker's quote
    Client,
    /// Market maker offloading inventory to a competitor (or the exchange)
    Hedge,
}

/// Immutable record of an executed trade
///
/// Volumes are signed from the taker's point of view: positive means the
/// taker bought. Spreads are relative to the mid-price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    /// Simulation step the trade executed in
    pub step: u64,
    pub kind: TradeKind,
    /// Aggressor (investor for client flow, hedging dealer for hedges)
    pub taker: Participant,
    /// Liquidity provider whose quote was hit
    pub maker: Participant,
    /// Signed taker volume (+ = taker buys)
    pub taker_volume: f64,
    /// Executed spread relative to mid
    pub spread: f64,
    /// Mid-price at execution
    pub mid_price: f64,
    /// Executed price: mid * (1 + side * spread)
    pub price: f64,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TradeId,
        step: u64,
        kind: TradeKind,
        taker: Participant,
        maker: Participant,
        taker_side: Side,
        volume: f64,
        spread: f64,
        mid_price: f64,
    ) -> Self {
        let volume = volume.abs();
        Self {
            id,
            step,
            kind,
            taker,
            maker,
            taker_volume: taker_side.sign() * volume,
            spread,
            mid_price,
            price: mid_price * (1.0 + taker_side.sign() * spread),
        }
    }

    /// Absolute traded volume
    pub fn volume(&self) -> f64 {
        self.taker_volume.abs()
    }

    pub fn taker_side(&self) -> Side {
        if self.taker_volume >= 0.0 {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    pub fn is_client(&self) -> bool {
        self.kind == TradeKind::Client
    }

    pub fn is_hedge(&self) -> bool {
        self.kind == TradeKind::Hedge
    }

    /// Investor involved, if this is client flow
    pub fn investor(&self) -> Option<InvestorId> {
        self.taker.investor().or_else(|| self.maker.investor())
    }

    /// Signed inventory change for the given market maker, or `None` if it is
    /// not a counterparty
    pub fn signed_volume_for(&self, market_maker: MarketMakerId) -> Option<f64> {
        if self.taker.is_dealer(market_maker) {
            Some(self.taker_volume)
        } else if self.maker.is_dealer(market_maker) {
            Some(-self.taker_volume)
        } else {
            None
        }
    }

    /// Spread paid by the taker in quote currency: spread * |v| * mid
    pub fn spread_notional(&self) -> f64 {
        self.spread * self.volume() * self.mid_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn client_buy() -> Trade {
        Trade::new(
            TradeId(1),
            3,
            TradeKind::Client,
            Participant::Investor(InvestorId(7)),
            Participant::Dealer(MarketMakerId(1)),
            Side::Buy,
            100.0,
            2e-4,
            100.0,
        )
    }

    #[test]
    fn test_client_trade_perspectives() {
        let trade = client_buy();

        assert_eq!(trade.taker_side(), Side::Buy);
        assert_eq!(trade.investor(), Some(InvestorId(7)));
        // Dealer sold to the investor
        assert_eq!(trade.signed_volume_for(MarketMakerId(1)), Some(-100.0));
        assert_eq!(trade.signed_volume_for(MarketMakerId(0)), None);
        assert_relative_eq!(trade.price, 100.02, epsilon = 1e-9);
    }

    #[test]
    fn test_hedge_trade_perspectives() {
        let trade = Trade::new(
            TradeId(2),
            3,
            TradeKind::Hedge,
            Participant::Dealer(MarketMakerId(0)),
            Participant::Dealer(MarketMakerId(1)),
            Side::Sell,
            40.0,
            1e-4,
            100.0,
        );

        assert!(trade.is_hedge());
        assert_eq!(trade.investor(), None);
        assert_eq!(trade.signed_volume_for(MarketMakerId(0)), Some(-40.0));
        assert_eq!(trade.signed_volume_for(MarketMakerId(1)), Some(40.0));
        assert_relative_eq!(trade.spread_notional(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&client_buy()).unwrap();
        assert!(json.contains("\"kind\":\"client\""));
        assert!(json.contains("\"investor\":7"));
    }
}
