//! Sell/buy price pairs for held players.
//!
//! The selling price is upstream truth: the league's profit-sharing
//! formula is already applied there and is never recomputed here.

use crate::types::Price;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SellPriceSource {
    Reported,
    /// Upstream sent no selling price; market price stands in.
    MarketFallback,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceInfo {
    pub selling_price: Price,
    pub market_price:  Price,
    /// market - selling: unrealised rise not yet banked.
    pub delta:         Price,
    pub sell_source:   SellPriceSource,
}

impl PriceInfo {
    pub fn sell_price_reported(&self) -> bool {
        self.sell_source == SellPriceSource::Reported
    }
}

/// `market - selling`, exact to one decimal place.
pub fn price_delta(selling: Price, market: Price) -> Price {
    market - selling
}

pub fn resolve_price(selling: Option<Price>, market: Price) -> PriceInfo {
    let (selling_price, sell_source) = match selling {
        Some(p) => (p, SellPriceSource::Reported),
        None => (market, SellPriceSource::MarketFallback),
    };
    PriceInfo {
        selling_price,
        market_price: market,
        delta: price_delta(selling_price, market),
        sell_source,
    }
}
