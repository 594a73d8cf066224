//! Interactive trading session.
//!
//! Generic over its input and output so the whole menu loop can be driven
//! from a byte slice in tests.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use stockmarket_core::{
    find_best_window, search_by_ticker, sort_by_price, HashTable, PriceOrder, PriceSimulator,
    Stock, TradeSide,
};
use stockmarket_runner::{MarketStore, TradingDesk};

use crate::display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Buy,
    Sell,
    Portfolio,
    ListAll,
    ListSorted,
    History,
    Advance,
    Exit,
}

impl MenuChoice {
    fn from_number(n: i64) -> Option<Self> {
        Some(match n {
            1 => Self::Buy,
            2 => Self::Sell,
            3 => Self::Portfolio,
            4 => Self::ListAll,
            5 => Self::ListSorted,
            6 => Self::History,
            7 => Self::Advance,
            8 => Self::Exit,
            _ => return None,
        })
    }
}

pub struct Session<R, W> {
    input: R,
    out: W,
    store: MarketStore,
    desk: TradingDesk,
    simulator: PriceSimulator,
    current: HashTable<String, Stock>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        store: MarketStore,
        desk: TradingDesk,
        simulator: PriceSimulator,
        input: R,
        out: W,
    ) -> Result<Self> {
        let current = store
            .load_current_stocks()
            .context("failed to load current stocks")?;
        Ok(Self {
            input,
            out,
            store,
            desk,
            simulator,
            current,
        })
    }

    pub fn desk(&self) -> &TradingDesk {
        &self.desk
    }

    /// Run the menu loop until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        display::banner(&mut self.out, "WELCOME TO STOCK MARKET ANALYSIS & TRADING SYSTEM")?;
        writeln!(
            self.out,
            "Starting Portfolio: ${:.2}",
            self.desk.portfolio().cash_balance()
        )?;

        loop {
            self.print_menu()?;
            let Some(number) = self.prompt_number::<i64>("Enter your choice: ")? else {
                break;
            };
            match MenuChoice::from_number(number) {
                Some(MenuChoice::Buy) => self.trade(TradeSide::Buy)?,
                Some(MenuChoice::Sell) => self.trade(TradeSide::Sell)?,
                Some(MenuChoice::Portfolio) => {
                    let report = self.desk.report(&self.current);
                    display::portfolio(&mut self.out, &report)?;
                }
                Some(MenuChoice::ListAll) => {
                    let mut all = self.current.values();
                    all.as_mut_slice().sort_by(|a, b| a.ticker.cmp(&b.ticker));
                    display::stocks(&mut self.out, "ALL STOCKS", &all)?;
                }
                Some(MenuChoice::ListSorted) => self.list_sorted()?,
                Some(MenuChoice::History) => self.history()?,
                Some(MenuChoice::Advance) => self.advance()?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.out, "\nThank you for using the Stock Market System!")?;
                    break;
                }
                None => writeln!(self.out, "\nInvalid choice! Please try again.")?,
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        display::banner(&mut self.out, "MAIN MENU")?;
        for line in [
            "1. Buy Stock",
            "2. Sell Stock",
            "3. View Portfolio",
            "4. Display All Stocks",
            "5. Display Stocks Sorted by Price",
            "6. View Stock History & Best Buy/Sell Days",
            "7. Advance to Next Day",
            "8. Exit",
        ] {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out, "{}", "=".repeat(80))?;
        Ok(())
    }

    fn trade(&mut self, side: TradeSide) -> Result<()> {
        let Some(ticker) = self.prompt("\nEnter stock ticker symbol: ")? else {
            return Ok(());
        };
        let Some(stock) = search_by_ticker(&self.current, &ticker).cloned() else {
            writeln!(self.out, "Stock not found!")?;
            return Ok(());
        };

        writeln!(self.out, "\nStock Details:\n{stock}")?;
        writeln!(self.out, "Current Price: ${:.2}", stock.avg_price())?;

        let label = match side {
            TradeSide::Buy => "Enter quantity to buy: ",
            TradeSide::Sell => "Enter quantity to sell: ",
        };
        let Some(raw) = self.prompt_number::<i64>(label)? else {
            return Ok(());
        };
        let Some(quantity) = u32::try_from(raw).ok().filter(|&q| q > 0) else {
            writeln!(self.out, "Invalid quantity!")?;
            return Ok(());
        };

        let result = match side {
            TradeSide::Buy => self.desk.buy(&stock, quantity),
            TradeSide::Sell => self.desk.sell(&stock, quantity),
        };
        match result {
            Ok(tx) => display::trade(&mut self.out, &tx, self.desk.portfolio().cash_balance())?,
            Err(err) => writeln!(self.out, "\nTrade rejected: {err}")?,
        }
        Ok(())
    }

    fn list_sorted(&mut self) -> Result<()> {
        writeln!(self.out, "\n1. Sort Low to High\n2. Sort High to Low")?;
        let Some(choice) = self.prompt_number::<i64>("Enter choice: ")? else {
            return Ok(());
        };
        let order = PriceOrder::from_ascending(choice == 1);

        let mut stocks = self.current.values();
        sort_by_price(&mut stocks, order);
        let title = match order {
            PriceOrder::Ascending => "STOCKS SORTED BY PRICE (LOW TO HIGH)",
            PriceOrder::Descending => "STOCKS SORTED BY PRICE (HIGH TO LOW)",
        };
        display::stocks(&mut self.out, title, &stocks)?;
        Ok(())
    }

    fn history(&mut self) -> Result<()> {
        let Some(ticker) = self.prompt("\nEnter stock ticker symbol: ")? else {
            return Ok(());
        };
        let ticker = ticker.to_uppercase();
        let history = self.store.load_history(&ticker)?;
        if history.is_empty() {
            writeln!(self.out, "No history found for {ticker}")?;
            return Ok(());
        }
        let window = find_best_window(&history);
        display::history(&mut self.out, &ticker, &history, window.as_ref())?;
        Ok(())
    }

    fn advance(&mut self) -> Result<()> {
        writeln!(self.out, "\nAdvancing to next trading day...")?;
        match self.store.advance_day(&mut self.simulator) {
            Ok(summary) => {
                self.current = self.store.load_current_stocks()?;
                writeln!(
                    self.out,
                    "Market advanced to {} ({} stocks updated)",
                    summary.date.format(stockmarket_core::DATE_FORMAT),
                    summary.rows
                )?;
            }
            Err(err) => {
                tracing::warn!(error = %err, "day advance failed");
                writeln!(self.out, "Could not advance the market: {err}")?;
            }
        }
        Ok(())
    }

    /// Read one trimmed line. `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Re-prompt until the line parses as `T`.
    fn prompt_number<T: FromStr>(&mut self, label: &str) -> Result<Option<T>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.out, "Invalid input! Please enter a number.")?,
            }
        }
    }
}
