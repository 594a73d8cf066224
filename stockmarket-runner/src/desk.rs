//! Trading desk: executes buy/sell requests against the session portfolio.
//!
//! Trades fill at the quoted stock's average price on the quote's date. Each
//! fill is kept in the session log and appended to the trade journal when one
//! is attached.

use serde::Serialize;

use stockmarket_core::{HashTable, Portfolio, Stock, TradeError, TradeSide, Transaction};

use crate::journal::TradeJournal;

/// One held position valued at the current price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingRow {
    pub ticker: String,
    pub quantity: u32,
    pub avg_buy_price: f64,
    pub current_price: f64,
    /// `(current_price - avg_buy_price) * quantity`.
    pub pnl: f64,
}

/// Portfolio valuation against a market snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub cash: f64,
    /// Priced holdings, sorted by ticker.
    pub holdings: Vec<HoldingRow>,
    /// Held tickers with no quote in the snapshot; valued at zero.
    pub unpriced: Vec<String>,
    pub total_pnl: f64,
    pub net_worth: f64,
}

impl PortfolioReport {
    pub fn has_positions(&self) -> bool {
        !self.holdings.is_empty() || !self.unpriced.is_empty()
    }
}

pub struct TradingDesk {
    portfolio: Portfolio,
    journal: Option<TradeJournal>,
    transactions: Vec<Transaction>,
}

impl TradingDesk {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            portfolio: Portfolio::new(initial_cash),
            journal: None,
            transactions: Vec::new(),
        }
    }

    /// Persist every future fill to `journal`.
    pub fn with_journal(mut self, journal: TradeJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Fills executed during this session, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn buy(&mut self, stock: &Stock, quantity: u32) -> Result<Transaction, TradeError> {
        let price = stock.avg_price();
        self.portfolio.buy(&stock.ticker, quantity, price)?;
        Ok(self.record(stock, TradeSide::Buy, quantity, price))
    }

    pub fn sell(&mut self, stock: &Stock, quantity: u32) -> Result<Transaction, TradeError> {
        let price = stock.avg_price();
        self.portfolio.sell(&stock.ticker, quantity, price)?;
        Ok(self.record(stock, TradeSide::Sell, quantity, price))
    }

    /// Value every position at the snapshot's average price.
    pub fn report(&self, current_prices: &HashTable<String, Stock>) -> PortfolioReport {
        let mut holdings = Vec::new();
        let mut unpriced = Vec::new();

        for (ticker, &quantity) in self.portfolio.holdings() {
            let avg_buy_price = self.portfolio.cost_basis(ticker).unwrap_or(0.0);
            match current_prices.get(ticker) {
                Some(stock) => {
                    let current_price = stock.avg_price();
                    holdings.push(HoldingRow {
                        ticker: ticker.clone(),
                        quantity,
                        avg_buy_price,
                        current_price,
                        pnl: (current_price - avg_buy_price) * f64::from(quantity),
                    });
                }
                None => unpriced.push(ticker.clone()),
            }
        }
        holdings.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        unpriced.sort();

        PortfolioReport {
            cash: self.portfolio.cash_balance(),
            total_pnl: holdings.iter().map(|row| row.pnl).sum(),
            net_worth: self.portfolio.net_worth(current_prices),
            holdings,
            unpriced,
        }
    }

    fn record(&mut self, stock: &Stock, side: TradeSide, quantity: u32, price: f64) -> Transaction {
        let tx = Transaction::new(stock.ticker.clone(), side, quantity, price, stock.date);
        tracing::info!(
            ticker = %tx.ticker,
            side = %tx.side,
            quantity,
            price,
            cash = self.portfolio.cash_balance(),
            "trade executed"
        );

        // The fill already happened; a journal failure must not undo it.
        if let Some(journal) = &self.journal {
            if let Err(err) = journal.append(&tx) {
                tracing::warn!(error = %err, path = %journal.path().display(), "failed to journal trade");
            }
        }

        self.transactions.push(tx.clone());
        tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn quote(ticker: &str, high: f64, low: f64) -> Stock {
        Stock::new(
            format!("{ticker} Inc"),
            ticker,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            high,
            low,
        )
    }

    fn snapshot(stocks: &[Stock]) -> HashTable<String, Stock> {
        stocks.iter().map(|s| (s.ticker.clone(), s.clone())).collect()
    }

    #[test]
    fn buy_fills_at_average_price() {
        let mut desk = TradingDesk::new(1_000.0);
        let tx = desk.buy(&quote("AAPL", 110.0, 90.0), 5).unwrap();
        assert_eq!(tx.price, 100.0);
        assert_eq!(tx.side, TradeSide::Buy);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(desk.portfolio().cash_balance(), 500.0);
        assert_eq!(desk.transactions().len(), 1);
    }

    #[test]
    fn rejected_trade_is_not_logged() {
        let mut desk = TradingDesk::new(100.0);
        let err = desk.buy(&quote("AAPL", 110.0, 90.0), 5).unwrap_err();
        assert!(matches!(err, TradeError::InsufficientFunds { .. }));
        assert!(desk.transactions().is_empty());

        let err = desk.sell(&quote("AAPL", 110.0, 90.0), 1).unwrap_err();
        assert!(matches!(err, TradeError::InsufficientShares { .. }));
        assert!(desk.transactions().is_empty());
    }

    #[test]
    fn report_values_positions() {
        let mut desk = TradingDesk::new(10_000.0);
        desk.buy(&quote("MSFT", 21.0, 19.0), 10).unwrap(); // basis 20
        desk.buy(&quote("AAPL", 11.0, 9.0), 10).unwrap(); // basis 10
        desk.buy(&quote("GONE", 6.0, 4.0), 10).unwrap(); // basis 5

        let current = snapshot(&[quote("MSFT", 26.0, 24.0), quote("AAPL", 9.0, 7.0)]);
        let report = desk.report(&current);

        assert_eq!(report.cash, 9_650.0);
        let tickers: Vec<&str> = report.holdings.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(report.holdings[0].pnl, -20.0);
        assert_eq!(report.holdings[1].pnl, 50.0);
        assert_eq!(report.total_pnl, 30.0);
        assert_eq!(report.unpriced, vec!["GONE".to_string()]);
        // 9650 + 10*25 + 10*8
        assert_eq!(report.net_worth, 9_980.0);
        assert!(report.has_positions());
    }

    #[test]
    fn empty_portfolio_report() {
        let desk = TradingDesk::new(500.0);
        let report = desk.report(&HashTable::new());
        assert!(!report.has_positions());
        assert_eq!(report.net_worth, 500.0);
    }

    #[test]
    fn fills_are_journaled() {
        let tmp = TempDir::new().unwrap();
        let journal_path = tmp.path().join("tx.jsonl");
        let mut desk = TradingDesk::new(1_000.0).with_journal(TradeJournal::new(&journal_path));

        let stock = quote("IBM", 51.0, 49.0);
        desk.buy(&stock, 10).unwrap();
        desk.sell(&stock, 10).unwrap();
        assert_eq!(desk.portfolio().cash_balance(), 1_000.0);

        let logged = TradeJournal::new(&journal_path).read_all().unwrap();
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[1].side, TradeSide::Sell);
        assert_eq!(logged, desk.transactions());
    }
}
