//! Best single buy/sell window over a price history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collections::DynamicArray;
use crate::domain::Stock;

/// Most profitable single round trip: buy at one day's low, sell at a later day's high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeWindow {
    pub buy_index: usize,
    pub sell_index: usize,
    /// Profit per share: `history[sell].high_price - history[buy].low_price`.
    pub profit: f64,
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
}

/// Single left-to-right pass tracking the lowest low seen so far.
///
/// Each day is first evaluated as a sell against the running minimum and only
/// then considered as a new minimum, so `buy_index < sell_index` always. Only
/// one transaction is searched for. Returns `None` for fewer than two days or
/// when no window yields a strictly positive profit.
pub fn find_best_window(history: &DynamicArray<Stock>) -> Option<TradeWindow> {
    let days = history.as_slice();
    let first = days.first()?;
    if days.len() < 2 {
        return None;
    }

    let mut min_low = first.low_price;
    let mut min_index = 0;
    let mut best: Option<(usize, usize, f64)> = None;
    let mut best_profit = 0.0;

    for (i, day) in days.iter().enumerate().skip(1) {
        let profit = day.high_price - min_low;
        if profit > best_profit {
            best_profit = profit;
            best = Some((min_index, i, profit));
        }

        if day.low_price < min_low {
            min_low = day.low_price;
            min_index = i;
        }
    }

    let (buy_index, sell_index, profit) = best?;
    Some(TradeWindow {
        buy_index,
        sell_index,
        profit,
        buy_date: days[buy_index].date,
        sell_date: days[sell_index].date,
    })
}
