use serde::{Deserialize, Serialize};

/// Raw ticker payload.
///
/// Feeds disagree on field names (`bestAskPrice` vs `ask` vs `askPrice`), so
/// every alias is optional and `normalize` picks the first usable value per
/// side, falling back to the last trade price.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickerMessage {
    #[serde(default)]
    pub symbol: String,

    #[serde(
        default,
        rename = "bestAskPrice",
        deserialize_with = "crate::models::num::opt_f64"
    )]
    pub best_ask_price: Option<f64>,

    #[serde(default, deserialize_with = "crate::models::num::opt_f64")]
    pub ask: Option<f64>,

    #[serde(default, rename = "askPrice", deserialize_with = "crate::models::num::opt_f64")]
    pub ask_price: Option<f64>,

    #[serde(
        default,
        rename = "bestBidPrice",
        deserialize_with = "crate::models::num::opt_f64"
    )]
    pub best_bid_price: Option<f64>,

    #[serde(default, deserialize_with = "crate::models::num::opt_f64")]
    pub bid: Option<f64>,

    #[serde(default, rename = "bidPrice", deserialize_with = "crate::models::num::opt_f64")]
    pub bid_price: Option<f64>,

    #[serde(default, rename = "lastPrice", deserialize_with = "crate::models::num::opt_f64")]
    pub last_price: Option<f64>,
}

impl TickerMessage {
    pub fn derived_ask(&self) -> Option<f64> {
        self.best_ask_price
            .or(self.ask)
            .or(self.ask_price)
            .or(self.last_price)
    }

    pub fn derived_bid(&self) -> Option<f64> {
        self.best_bid_price
            .or(self.bid)
            .or(self.bid_price)
            .or(self.last_price)
    }

    /// Collapses the alias fields into the one shape the engines consume.
    /// `None` when neither side of the book can be derived.
    pub fn normalize(&self) -> Option<Quote> {
        let ask = self.derived_ask()?;
        let bid = self.derived_bid()?;

        Some(Quote {
            bid,
            ask,
            last: self.last_price,
        })
    }
}

/// Normalized ticker snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    pub bid: f64,
    pub ask: f64,
    pub last: Option<f64>,
}
