//! Transaction: immutable log record of one executed trade.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::stock::DATE_FORMAT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::Sell => f.write_str("SELL"),
        }
    }
}

/// One executed trade. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub ticker: String,
    pub side: TradeSide,
    pub quantity: u32,
    pub price: f64,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(
        ticker: impl Into<String>,
        side: TradeSide,
        quantity: u32,
        price: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            side,
            quantity,
            price,
            date,
        }
    }

    /// Cash moved by the trade: `quantity * price`.
    pub fn total(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {} shares of {} @ ${:.2}",
            self.date.format(DATE_FORMAT),
            self.side,
            self.quantity,
            self.ticker,
            self.price
        )
    }
}
