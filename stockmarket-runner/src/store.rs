//! Market store: flat CSV persistence of daily stock rows.
//!
//! Layout: `{data_dir}/{stock_file}` with header `Name,Ticker,Date,HighPrice,LowPrice`
//! followed by one row per ticker per day, oldest first. Dates are `dd-mm-yyyy`,
//! prices have two decimals. Rows are only ever appended.
//!
//! Unparseable rows are skipped with a warning before anything reaches the core.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use rand::Rng;
use thiserror::Error;

use stockmarket_core::domain::DATE_FORMAT;
use stockmarket_core::{DynamicArray, HashTable, PriceSimulator, Stock};

use crate::config::MarketConfig;

pub const CSV_HEADER: [&str; 5] = ["Name", "Ticker", "Date", "HighPrice", "LowPrice"];

/// Lowest price written for a simulated day.
pub const MIN_LISTED_PRICE: f64 = 1.0;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("seed file missing: {0}")]
    SeedFileMissing(PathBuf),

    #[error("no stocks found in {0}")]
    EmptyMarket(PathBuf),
}

/// What [`MarketStore::initialize`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The stock file was already present and left untouched.
    Existing,
    /// A fresh stock file was written from the seed file.
    Created { rows: usize },
}

/// Result of simulating one trading day.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceSummary {
    pub date: NaiveDate,
    pub rows: usize,
}

/// Latest row per ticker plus the newest date in the file.
struct Scan {
    latest: HashTable<String, Stock>,
    last_date: Option<NaiveDate>,
}

pub struct MarketStore {
    stock_path: PathBuf,
    seed_path: PathBuf,
}

impl MarketStore {
    pub fn new(stock_path: impl Into<PathBuf>, seed_path: impl Into<PathBuf>) -> Self {
        Self {
            stock_path: stock_path.into(),
            seed_path: seed_path.into(),
        }
    }

    pub fn from_config(config: &MarketConfig) -> Self {
        Self::new(config.stock_path(), config.seed_path())
    }

    pub fn stock_path(&self) -> &Path {
        &self.stock_path
    }

    /// Create the stock file from the seed file unless it already exists.
    ///
    /// Seed lines with fewer than five fields, and a leading header line, are
    /// dropped. Fields are copied as raw bytes, so a row that is not valid
    /// UTF-8 survives seeding and is skipped later on read. The file is built
    /// next to its final path and renamed into place, so a failed seed never
    /// leaves a partial market behind.
    pub fn initialize(&self) -> Result<InitOutcome, StoreError> {
        if self.stock_path.exists() {
            tracing::debug!(path = %self.stock_path.display(), "stock data already present");
            return Ok(InitOutcome::Existing);
        }
        if !self.seed_path.exists() {
            return Err(StoreError::SeedFileMissing(self.seed_path.clone()));
        }

        if let Some(parent) = self.stock_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let staging = self.staging_path();
        let rows = match self.write_seeded(&staging) {
            Ok(rows) => rows,
            Err(err) => {
                let _ = fs::remove_file(&staging);
                return Err(err);
            }
        };
        fs::rename(&staging, &self.stock_path).map_err(|source| {
            let _ = fs::remove_file(&staging);
            StoreError::Io {
                path: self.stock_path.clone(),
                source,
            }
        })?;

        tracing::info!(rows, path = %self.stock_path.display(), "created stock data from seed file");
        Ok(InitOutcome::Created { rows })
    }

    /// `{stock_file}.tmp` in the same directory, so the rename stays on one filesystem.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .stock_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.stock_path.with_file_name(name)
    }

    fn write_seeded(&self, target: &Path) -> Result<usize, StoreError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_path(&self.seed_path)?;
        let mut writer = WriterBuilder::new().from_path(target)?;
        writer.write_record(CSV_HEADER)?;

        let mut rows = 0;
        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            if record.len() < CSV_HEADER.len() || is_header(&record) {
                continue;
            }
            writer.write_record(record.iter().take(CSV_HEADER.len()))?;
            rows += 1;
        }
        writer.flush().map_err(|source| StoreError::Io {
            path: target.to_path_buf(),
            source,
        })?;
        Ok(rows)
    }

    /// Latest snapshot: ticker → the last row recorded for it.
    pub fn load_current_stocks(&self) -> Result<HashTable<String, Stock>, StoreError> {
        Ok(self.scan()?.latest)
    }

    /// Every row for `ticker` (case-insensitive), oldest first.
    pub fn load_history(&self, ticker: &str) -> Result<DynamicArray<Stock>, StoreError> {
        let wanted = ticker.trim().to_uppercase();
        let mut history = DynamicArray::new();
        for stock in self.read_rows()? {
            if stock.ticker == wanted {
                history.push(stock);
            }
        }
        Ok(history)
    }

    /// Append one simulated day for every ticker in the latest snapshot.
    ///
    /// The new date is the day after the newest row. Both simulated prices are
    /// floored at [`MIN_LISTED_PRICE`], keeping the high at least a cent above the low.
    pub fn advance_day<R: Rng>(
        &self,
        simulator: &mut PriceSimulator<R>,
    ) -> Result<AdvanceSummary, StoreError> {
        let scan = self.scan()?;
        let Some(last_date) = scan.last_date else {
            return Err(StoreError::EmptyMarket(self.stock_path.clone()));
        };
        let date = last_date.succ_opt().unwrap_or(last_date);

        let mut tickers = scan.latest.keys();
        tickers.as_mut_slice().sort_unstable();

        let file = OpenOptions::new()
            .append(true)
            .open(&self.stock_path)
            .map_err(|source| StoreError::Io {
                path: self.stock_path.clone(),
                source,
            })?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        let date_text = date.format(DATE_FORMAT).to_string();
        let mut rows = 0;
        for ticker in &tickers {
            let Some(stock) = scan.latest.get(ticker) else {
                continue;
            };
            let next = simulator.next_prices(stock.high_price, stock.low_price);
            let low = next.low.max(MIN_LISTED_PRICE);
            let high = next.high.max(low + 0.01);
            let high_text = format!("{high:.2}");
            let low_text = format!("{low:.2}");

            writer.write_record([
                stock.name.as_str(),
                stock.ticker.as_str(),
                date_text.as_str(),
                high_text.as_str(),
                low_text.as_str(),
            ])?;
            rows += 1;
        }
        writer.flush().map_err(|source| StoreError::Io {
            path: self.stock_path.clone(),
            source,
        })?;

        tracing::info!(%date, rows, "market advanced");
        Ok(AdvanceSummary { date, rows })
    }

    fn scan(&self) -> Result<Scan, StoreError> {
        let mut latest = HashTable::new();
        let mut last_date = None;
        for stock in self.read_rows()? {
            last_date = Some(stock.date);
            latest.insert(stock.ticker.clone(), stock);
        }
        Ok(Scan { latest, last_date })
    }

    /// Parse every well-formed row in file order.
    fn read_rows(&self) -> Result<Vec<Stock>, StoreError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(&self.stock_path)?;

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            match record {
                Ok(record) => match parse_record(&record) {
                    Some(stock) => rows.push(stock),
                    None => {
                        tracing::warn!(line = line + 2, record = ?record, "skipping bad CSV row");
                    }
                },
                Err(err) => tracing::warn!(line = line + 2, error = %err, "skipping unreadable CSV row"),
            }
        }
        Ok(rows)
    }
}

fn is_header(record: &ByteRecord) -> bool {
    record
        .get(0)
        .is_some_and(|first| first.eq_ignore_ascii_case(CSV_HEADER[0].as_bytes()))
}

/// `name, ticker, dd-mm-yyyy, high, low`. Extra trailing fields are ignored.
fn parse_record(record: &StringRecord) -> Option<Stock> {
    if record.len() < CSV_HEADER.len() {
        return None;
    }
    let name = record.get(0)?;
    let ticker = record.get(1)?;
    if ticker.is_empty() {
        return None;
    }
    let date = NaiveDate::parse_from_str(record.get(2)?, DATE_FORMAT).ok()?;
    let high: f64 = record.get(3)?.parse().ok()?;
    let low: f64 = record.get(4)?.parse().ok()?;
    if !high.is_finite() || !low.is_finite() {
        return None;
    }
    Some(Stock::new(name, ticker.to_uppercase(), date, high, low))
}
