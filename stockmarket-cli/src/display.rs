//! Console rendering shared by the one-shot commands and the trading menu.

use std::io::{self, Write};

use stockmarket_core::{DynamicArray, Stock, TradeWindow, Transaction, DATE_FORMAT};
use stockmarket_runner::{BenchmarkRecord, PortfolioReport};

const WIDTH: usize = 80;

pub fn banner(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(WIDTH))?;
    writeln!(out, "{title:^width$}", width = WIDTH)?;
    writeln!(out, "{}", "=".repeat(WIDTH))
}

pub fn stocks<'a>(
    out: &mut impl Write,
    title: &str,
    stocks: impl IntoIterator<Item = &'a Stock>,
) -> io::Result<()> {
    banner(out, title)?;
    let mut count = 0;
    for stock in stocks {
        writeln!(out, "{stock}")?;
        count += 1;
    }
    if count == 0 {
        writeln!(out, "No stocks available.")?;
    }
    writeln!(out, "{}", "=".repeat(WIDTH))
}

/// History rows followed by the best buy/sell window, if any.
pub fn history(
    out: &mut impl Write,
    ticker: &str,
    history: &DynamicArray<Stock>,
    window: Option<&TradeWindow>,
) -> io::Result<()> {
    stocks(out, &format!("HISTORY FOR {ticker}"), history)?;

    match window {
        Some(window) => {
            banner(out, "BEST BUY/SELL OPPORTUNITY")?;
            writeln!(
                out,
                "Buy Date:  {} (Day {})",
                window.buy_date.format(DATE_FORMAT),
                window.buy_index
            )?;
            writeln!(
                out,
                "Sell Date: {} (Day {})",
                window.sell_date.format(DATE_FORMAT),
                window.sell_index
            )?;
            writeln!(out, "Maximum Profit: ${:.2} per share", window.profit)?;
            writeln!(out, "{}", "=".repeat(WIDTH))
        }
        None => writeln!(out, "\nNo profitable buy/sell opportunity found in history."),
    }
}

pub fn portfolio(out: &mut impl Write, report: &PortfolioReport) -> io::Result<()> {
    banner(out, "YOUR PORTFOLIO")?;
    writeln!(out, "\nCash Balance: ${:.2}\n", report.cash)?;

    if !report.has_positions() {
        writeln!(out, "No stock holdings.")?;
    } else {
        writeln!(out, "Stock Holdings:")?;
        writeln!(out, "{}", "-".repeat(WIDTH))?;
        writeln!(
            out,
            "{:<10} {:<12} {:<15} {:<15} {:<15}",
            "Ticker", "Quantity", "Avg Buy Price", "Current Price", "Profit/Loss"
        )?;
        writeln!(out, "{}", "-".repeat(WIDTH))?;
        for row in &report.holdings {
            writeln!(
                out,
                "{:<10} {:<12} ${:<14.2} ${:<14.2} ${:<14.2}",
                row.ticker, row.quantity, row.avg_buy_price, row.current_price, row.pnl
            )?;
        }
        for ticker in &report.unpriced {
            writeln!(out, "{ticker:<10} (no current price)")?;
        }
        writeln!(out, "{}", "-".repeat(WIDTH))?;
        writeln!(out, "Total Profit/Loss: ${:.2}", report.total_pnl)?;
    }

    writeln!(out, "\nTotal Net Worth: ${:.2}", report.net_worth)?;
    writeln!(out, "{}", "=".repeat(WIDTH))
}

pub fn trade(out: &mut impl Write, tx: &Transaction, cash: f64) -> io::Result<()> {
    let verb = match tx.side {
        stockmarket_core::TradeSide::Buy => "bought",
        stockmarket_core::TradeSide::Sell => "sold",
    };
    writeln!(
        out,
        "\nSuccessfully {verb} {} shares of {} at ${:.2} per share",
        tx.quantity, tx.ticker, tx.price
    )?;
    writeln!(out, "Total: ${:.2}", tx.total())?;
    writeln!(out, "Cash balance: ${cash:.2}")
}

pub fn benchmarks(out: &mut impl Write, records: &[BenchmarkRecord]) -> io::Result<()> {
    banner(out, "BENCHMARK RESULTS")?;
    writeln!(out, "{:<14} {:>10} {:>14}", "Function", "InputSize", "TimeMs")?;
    for record in records {
        writeln!(
            out,
            "{:<14} {:>10} {:>14.4}",
            record.function.as_str(),
            record.input_size,
            record.time_ms
        )?;
    }
    Ok(())
}
