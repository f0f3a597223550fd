//! Delayed position-revenue ledger
//!
//! Every position change is booked at its origination price and realised
//! `delay` steps later as `v · (P_{t0+H} - P_{t0})`. Entries are bucketed by
//! maturity step, so each step only touches what matures then.

use dealer_core::TradeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One position change awaiting recognition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingRevenue {
    pub trade_id: TradeId,
    pub origin_step: u64,
    /// Inventory change from the owner's perspective
    pub signed_volume: f64,
    /// Mid-price at origination
    pub origin_price: f64,
}

impl PendingRevenue {
    /// Revenue when marked at `price`
    pub fn revenue_at(&self, price: f64) -> f64 {
        self.signed_volume * (price - self.origin_price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardLedger {
    delay: u64,
    pending: BTreeMap<u64, Vec<PendingRevenue>>,
}

impl RewardLedger {
    pub fn new(delay: u64) -> Self {
        Self {
            delay,
            pending: BTreeMap::new(),
        }
    }

    pub fn delay(&self) -> u64 {
        self.delay
    }

    /// Book an entry for recognition at `origin_step + delay`
    pub fn enqueue(&mut self, entry: PendingRevenue) {
        self.pending
            .entry(entry.origin_step + self.delay)
            .or_default()
            .push(entry);
    }

    /// Realise everything maturing at or before `step`; each entry exactly once
    pub fn mature(&mut self, step: u64, price: f64) -> f64 {
        let later = self.pending.split_off(&(step + 1));
        let due = std::mem::replace(&mut self.pending, later);
        due.values().flatten().map(|entry| entry.revenue_at(price)).sum()
    }

    /// Number of entries not yet realised
    pub fn pending_len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return all unrealised entries, oldest first
    pub fn drain_unmatured(&mut self) -> Vec<PendingRevenue> {
        std::mem::take(&mut self.pending)
            .into_values()
            .flatten()
            .collect()
    }
}
