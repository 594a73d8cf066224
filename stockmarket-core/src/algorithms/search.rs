//! Ticker lookup against the current market snapshot.

use crate::collections::HashTable;
use crate::domain::Stock;

/// Look up `ticker` case-insensitively. Snapshot keys are stored upper-case.
pub fn search_by_ticker<'a>(stocks: &'a HashTable<String, Stock>, ticker: &str) -> Option<&'a Stock> {
    stocks.get(ticker.trim().to_uppercase().as_str())
}
