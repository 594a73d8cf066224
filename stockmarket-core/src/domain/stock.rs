//! Stock: one day's price record for a single ticker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date layout used wherever a stock date is rendered as text (`31-01-2025`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Daily high/low record for one ticker.
///
/// Identity is `(ticker, date)`. A ticker is unique only within one day's
/// snapshot. The core reads these records and never rewrites price fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub name: String,
    pub ticker: String,
    pub date: NaiveDate,
    pub high_price: f64,
    pub low_price: f64,
}

impl Stock {
    pub fn new(
        name: impl Into<String>,
        ticker: impl Into<String>,
        date: NaiveDate,
        high_price: f64,
        low_price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
            date,
            high_price,
            low_price,
        }
    }

    /// Midpoint of the day's range; the execution price for simulated trades.
    pub fn avg_price(&self) -> f64 {
        (self.high_price + self.low_price) / 2.0
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} {:<8} {:>12} High: ${:<8.2} Low: ${:<8.2}",
            self.name,
            self.ticker,
            self.date.format(DATE_FORMAT).to_string(),
            self.high_price,
            self.low_price
        )
    }
}
