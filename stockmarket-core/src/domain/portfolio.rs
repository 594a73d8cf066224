//! Portfolio: cash plus share holdings with a weighted-average cost basis.

use thiserror::Error;

use super::stock::Stock;
use crate::collections::HashTable;

/// Rejected trade. The portfolio is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradeError {
    #[error("quantity must be greater than zero")]
    ZeroQuantity,

    #[error("invalid price per share: {0}")]
    InvalidPrice(f64),

    #[error("insufficient funds: trade costs ${required:.2}, cash is ${available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("insufficient shares of {ticker}: requested {requested}, held {held}")]
    InsufficientShares {
        ticker: String,
        requested: u32,
        held: u32,
    },

    #[error("position in {ticker} would exceed the maximum share count")]
    QuantityOverflow { ticker: String },
}

/// Single-user portfolio.
///
/// A ticker is present in `holdings` iff it is present in `avg_buy_price`, and
/// every present quantity is positive: a position sold down to zero is removed
/// from both tables. `cash` never goes negative because buys that cost more
/// than the balance are rejected.
#[derive(Debug, Clone)]
pub struct Portfolio {
    cash: f64,
    holdings: HashTable<String, u32>,
    avg_buy_price: HashTable<String, f64>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            holdings: HashTable::new(),
            avg_buy_price: HashTable::new(),
        }
    }

    pub fn cash_balance(&self) -> f64 {
        self.cash
    }

    /// Ticker → shares held.
    pub fn holdings(&self) -> &HashTable<String, u32> {
        &self.holdings
    }

    /// Ticker → weighted-average price paid per share.
    pub fn avg_buy_price(&self) -> &HashTable<String, f64> {
        &self.avg_buy_price
    }

    pub fn quantity(&self, ticker: &str) -> Option<u32> {
        self.holdings.get(ticker).copied()
    }

    pub fn cost_basis(&self, ticker: &str) -> Option<f64> {
        self.avg_buy_price.get(ticker).copied()
    }

    pub fn has_position(&self, ticker: &str) -> bool {
        self.holdings.contains_key(ticker)
    }

    /// Buy `quantity` shares at `price` each.
    ///
    /// Opening a position records `price` as its cost basis; adding to one
    /// re-weights the basis: `(old_avg * old_qty + price * qty) / (old_qty + qty)`.
    pub fn buy(&mut self, ticker: &str, quantity: u32, price: f64) -> Result<(), TradeError> {
        validate_order(quantity, price)?;

        let required = f64::from(quantity) * price;
        if required > self.cash {
            return Err(TradeError::InsufficientFunds {
                required,
                available: self.cash,
            });
        }

        match self.holdings.get_mut(ticker) {
            Some(held) => {
                let old_qty = *held;
                let new_qty = old_qty
                    .checked_add(quantity)
                    .ok_or_else(|| TradeError::QuantityOverflow {
                        ticker: ticker.to_string(),
                    })?;
                let old_avg = self.avg_buy_price.get(ticker).copied().unwrap_or(price);
                let new_avg = (old_avg * f64::from(old_qty) + price * f64::from(quantity))
                    / f64::from(new_qty);

                *held = new_qty;
                self.avg_buy_price.insert(ticker.to_string(), new_avg);
            }
            None => {
                self.holdings.insert(ticker.to_string(), quantity);
                self.avg_buy_price.insert(ticker.to_string(), price);
            }
        }

        self.cash -= required;
        Ok(())
    }

    /// Sell `quantity` shares at `price` each.
    ///
    /// Selling the whole position removes the ticker from both holdings and
    /// cost basis. The cost basis of a partially sold position is unchanged.
    pub fn sell(&mut self, ticker: &str, quantity: u32, price: f64) -> Result<(), TradeError> {
        validate_order(quantity, price)?;

        let held = self.quantity(ticker).unwrap_or(0);
        if held < quantity {
            return Err(TradeError::InsufficientShares {
                ticker: ticker.to_string(),
                requested: quantity,
                held,
            });
        }

        if held == quantity {
            self.holdings.remove(ticker);
            self.avg_buy_price.remove(ticker);
        } else if let Some(remaining) = self.holdings.get_mut(ticker) {
            *remaining = held - quantity;
        }

        self.cash += f64::from(quantity) * price;
        Ok(())
    }

    /// Cash plus `quantity * avg_price` for every held ticker.
    ///
    /// Tickers missing from `current_prices` contribute nothing.
    pub fn net_worth(&self, current_prices: &HashTable<String, Stock>) -> f64 {
        let holdings_value: f64 = self
            .holdings
            .iter()
            .filter_map(|(ticker, qty)| {
                current_prices
                    .get(ticker)
                    .map(|stock| f64::from(*qty) * stock.avg_price())
            })
            .sum();
        self.cash + holdings_value
    }
}

fn validate_order(quantity: u32, price: f64) -> Result<(), TradeError> {
    if quantity == 0 {
        return Err(TradeError::ZeroQuantity);
    }
    if !price.is_finite() || price < 0.0 {
        return Err(TradeError::InvalidPrice(price));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn quote(ticker: &str, high: f64, low: f64) -> Stock {
        Stock::new(
            format!("{ticker} Corp"),
            ticker,
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            high,
            low,
        )
    }

    #[test]
    fn buy_opens_position_and_debits_cash() {
        let mut portfolio = Portfolio::new(1_000.0);
        portfolio.buy("AAPL", 4, 100.0).unwrap();
        assert_eq!(portfolio.cash_balance(), 600.0);
        assert_eq!(portfolio.quantity("AAPL"), Some(4));
        assert_eq!(portfolio.cost_basis("AAPL"), Some(100.0));
    }

    #[test]
    fn buy_beyond_cash_is_rejected_without_changes() {
        let mut portfolio = Portfolio::new(100.0);
        let err = portfolio.buy("AAPL", 2, 60.0).unwrap_err();
        assert_eq!(
            err,
            TradeError::InsufficientFunds {
                required: 120.0,
                available: 100.0
            }
        );
        assert_eq!(portfolio.cash_balance(), 100.0);
        assert!(!portfolio.has_position("AAPL"));
        assert!(portfolio.avg_buy_price().is_empty());
    }

    #[test]
    fn buy_exactly_all_cash_is_allowed() {
        let mut portfolio = Portfolio::new(100.0);
        portfolio.buy("AAPL", 2, 50.0).unwrap();
        assert_eq!(portfolio.cash_balance(), 0.0);
    }

    #[test]
    fn second_buy_reweights_cost_basis() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.buy("MSFT", 10, 100.0).unwrap();
        portfolio.buy("MSFT", 30, 200.0).unwrap();
        // (100*10 + 200*30) / 40 = 175
        assert_eq!(portfolio.quantity("MSFT"), Some(40));
        assert_eq!(portfolio.cost_basis("MSFT"), Some(175.0));
        assert_eq!(portfolio.cash_balance(), 3_000.0);
    }

    #[test]
    fn zero_quantity_and_bad_price_rejected() {
        let mut portfolio = Portfolio::new(100.0);
        assert_eq!(portfolio.buy("X", 0, 1.0), Err(TradeError::ZeroQuantity));
        assert!(matches!(
            portfolio.buy("X", 1, -1.0),
            Err(TradeError::InvalidPrice(_))
        ));
        assert!(matches!(
            portfolio.sell("X", 1, f64::NAN),
            Err(TradeError::InvalidPrice(_))
        ));
        assert_eq!(portfolio.cash_balance(), 100.0);
    }

    #[test]
    fn sell_without_position_fails() {
        let mut portfolio = Portfolio::new(100.0);
        let err = portfolio.sell("TSLA", 1, 10.0).unwrap_err();
        assert_eq!(
            err,
            TradeError::InsufficientShares {
                ticker: "TSLA".into(),
                requested: 1,
                held: 0
            }
        );
        assert_eq!(portfolio.cash_balance(), 100.0);
    }

    #[test]
    fn oversell_leaves_state_unchanged() {
        let mut portfolio = Portfolio::new(1_000.0);
        portfolio.buy("TSLA", 5, 10.0).unwrap();
        assert!(portfolio.sell("TSLA", 6, 10.0).is_err());
        assert_eq!(portfolio.quantity("TSLA"), Some(5));
        assert_eq!(portfolio.cash_balance(), 950.0);
    }

    #[test]
    fn partial_sell_keeps_cost_basis() {
        let mut portfolio = Portfolio::new(1_000.0);
        portfolio.buy("TSLA", 5, 10.0).unwrap();
        portfolio.sell("TSLA", 2, 20.0).unwrap();
        assert_eq!(portfolio.quantity("TSLA"), Some(3));
        assert_eq!(portfolio.cost_basis("TSLA"), Some(10.0));
        assert_eq!(portfolio.cash_balance(), 990.0);
    }

    #[test]
    fn full_sell_removes_both_entries() {
        let mut portfolio = Portfolio::new(1_000.0);
        portfolio.buy("TSLA", 5, 10.0).unwrap();
        portfolio.sell("TSLA", 5, 12.0).unwrap();
        assert!(!portfolio.holdings().contains_key("TSLA"));
        assert!(!portfolio.avg_buy_price().contains_key("TSLA"));
        assert_eq!(portfolio.cash_balance(), 1_010.0);
    }

    #[test]
    fn round_trip_restores_cash() {
        let mut portfolio = Portfolio::new(100_000.0);
        portfolio.buy("IBM", 10, 50.0).unwrap();
        portfolio.sell("IBM", 10, 50.0).unwrap();
        assert_eq!(portfolio.cash_balance(), 100_000.0);
        assert!(portfolio.holdings().is_empty());
        assert!(portfolio.avg_buy_price().is_empty());
    }

    #[test]
    fn net_worth_skips_unpriced_tickers() {
        let mut portfolio = Portfolio::new(1_000.0);
        portfolio.buy("AAPL", 2, 100.0).unwrap();
        portfolio.buy("GONE", 1, 100.0).unwrap();

        let mut prices = HashTable::new();
        prices.insert("AAPL".to_string(), quote("AAPL", 130.0, 110.0));

        // 700 cash + 2 * 120; GONE has no current price
        assert_eq!(portfolio.net_worth(&prices), 940.0);
    }
}
