//! Trade journal: JSONL append-only log of executed transactions.
//!
//! One JSON object per line keeps the file readable after a partial write:
//! a torn last line is skipped on read and every earlier trade survives.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use stockmarket_core::Transaction;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode transaction: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct TradeJournal {
    path: PathBuf,
}

impl TradeJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one transaction, creating the file and its directory if needed.
    pub fn append(&self, transaction: &Transaction) -> Result<(), JournalError> {
        let json = serde_json::to_string(transaction)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(file, "{json}")?;
        file.flush()?;
        Ok(())
    }

    /// Read every transaction in file order. A missing file reads as empty.
    ///
    /// Malformed lines are skipped.
    pub fn read_all(&self) -> Result<Vec<Transaction>, JournalError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = io::BufReader::new(fs::File::open(&self.path)?);
        let mut transactions = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Transaction>(&line) {
                Ok(tx) => transactions.push(tx),
                Err(err) => tracing::warn!(error = %err, "skipping malformed journal line"),
            }
        }

        Ok(transactions)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stockmarket_core::TradeSide;
    use tempfile::TempDir;

    fn tx(ticker: &str, side: TradeSide, quantity: u32) -> Transaction {
        Transaction::new(
            ticker,
            side,
            quantity,
            12.5,
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
        )
    }

    #[test]
    fn append_and_read_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let journal = TradeJournal::new(tmp.path().join("nested").join("tx.jsonl"));

        journal.append(&tx("AAPL", TradeSide::Buy, 10)).unwrap();
        journal.append(&tx("AAPL", TradeSide::Sell, 4)).unwrap();

        let all = journal.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].side, TradeSide::Buy);
        assert_eq!(all[1].quantity, 4);
    }

    #[test]
    fn read_nonexistent_file_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let journal = TradeJournal::new(tmp.path().join("missing.jsonl"));
        assert!(journal.read_all().unwrap().is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let journal = TradeJournal::new(tmp.path().join("tx.jsonl"));
        journal.append(&tx("MSFT", TradeSide::Buy, 1)).unwrap();

        let mut file = OpenOptions::new().append(true).open(journal.path()).unwrap();
        writeln!(file, "{{\"ticker\": \"MS").unwrap();

        let all = journal.read_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].ticker, "MSFT");
    }
}
