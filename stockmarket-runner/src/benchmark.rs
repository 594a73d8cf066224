//! Wall-clock benchmarks for search, best window and sort.
//!
//! Each benchmark warms up, then times a fixed number of repetitions with
//! `Instant`. Results go to a CSV with columns `Function,InputSize,TimeMs`.
//! Statistically rigorous numbers live in the criterion benches; this module
//! backs the `bench` command and its plotting CSV.

use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockmarket_core::{
    find_best_window, search_by_ticker, sort_by_price, DynamicArray, HashTable, PriceOrder,
    PriceSimulator, Stock,
};

const SEARCH_WARMUP: usize = 100;
const SEARCH_RUNS: usize = 1_000;
const WINDOW_WARMUP: usize = 10;
const WINDOW_RUNS: usize = 100;
const SORT_WARMUP: usize = 10;
const SORT_RUNS: usize = 10;

#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("failed to write benchmark results to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchFunction {
    StockSearch,
    BestBuySell,
    StockSort,
}

impl BenchFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            BenchFunction::StockSearch => "StockSearch",
            BenchFunction::BestBuySell => "BestBuySell",
            BenchFunction::StockSort => "StockSort",
        }
    }
}

impl std::fmt::Display for BenchFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timed measurement: total milliseconds for all repetitions at `input_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub function: BenchFunction,
    pub input_size: usize,
    pub time_ms: f64,
}

/// Run all three benchmarks at every size, in size order.
///
/// `seed` drives the synthetic price history and the random sort input so
/// repeated runs time the same data.
pub fn run_benchmarks(sizes: &[usize], seed: u64) -> Vec<BenchmarkRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut simulator = PriceSimulator::seeded(seed);
    let mut records = Vec::with_capacity(sizes.len() * 3);

    for &size in sizes {
        tracing::info!(size, "running benchmarks");
        for record in [
            bench_search(size),
            bench_best_window(size, &mut simulator),
            bench_sort(size, &mut rng),
        ] {
            tracing::debug!(
                function = %record.function,
                size = record.input_size,
                time_ms = record.time_ms,
                "benchmark finished"
            );
            records.push(record);
        }
    }

    records
}

/// Write records as CSV, replacing any existing file.
pub fn write_results(path: &Path, records: &[BenchmarkRecord]) -> Result<(), BenchmarkError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| BenchmarkError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = std::fs::File::create(path).map_err(|source| BenchmarkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(["Function", "InputSize", "TimeMs"])?;
    for record in records {
        wtr.write_record([
            record.function.as_str(),
            &record.input_size.to_string(),
            &format!("{:.4}", record.time_ms),
        ])?;
    }
    wtr.flush().map_err(|source| BenchmarkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn bench_search(size: usize) -> BenchmarkRecord {
    let table = search_fixture(size);
    let queries: Vec<String> = (0..SEARCH_RUNS).map(|i| format!("STOCK{}", i % size)).collect();

    for query in queries.iter().take(SEARCH_WARMUP) {
        black_box(search_by_ticker(&table, query));
    }

    let start = Instant::now();
    for query in &queries {
        black_box(search_by_ticker(&table, query));
    }
    record(BenchFunction::StockSearch, size, start)
}

fn bench_best_window(size: usize, simulator: &mut PriceSimulator) -> BenchmarkRecord {
    let history = history_fixture(size, simulator);

    for _ in 0..WINDOW_WARMUP {
        black_box(find_best_window(&history));
    }

    let start = Instant::now();
    for _ in 0..WINDOW_RUNS {
        black_box(find_best_window(&history));
    }
    record(BenchFunction::BestBuySell, size, start)
}

fn bench_sort(size: usize, rng: &mut StdRng) -> BenchmarkRecord {
    let stocks = sort_fixture(size, rng);

    for _ in 0..SORT_WARMUP {
        let mut copy = stocks.clone();
        sort_by_price(&mut copy, PriceOrder::Ascending);
        black_box(copy);
    }

    // Copies are part of the timed work, as each sort needs unsorted input.
    let start = Instant::now();
    for _ in 0..SORT_RUNS {
        let mut copy = stocks.clone();
        sort_by_price(&mut copy, PriceOrder::Ascending);
        black_box(copy);
    }
    record(BenchFunction::StockSort, size, start)
}

fn record(function: BenchFunction, input_size: usize, start: Instant) -> BenchmarkRecord {
    BenchmarkRecord {
        function,
        input_size,
        time_ms: start.elapsed().as_secs_f64() * 1_000.0,
    }
}

fn fixture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

fn search_fixture(size: usize) -> HashTable<String, Stock> {
    (0..size)
        .map(|i| {
            let ticker = format!("STOCK{i}");
            let stock = Stock::new(
                format!("Company {i}"),
                ticker.clone(),
                fixture_date(),
                100.0 + i as f64,
                95.0 + i as f64,
            );
            (ticker, stock)
        })
        .collect()
}

fn history_fixture(size: usize, simulator: &mut PriceSimulator) -> DynamicArray<Stock> {
    let mut history = DynamicArray::new();
    let (mut high, mut low) = (100.0, 95.0);
    for i in 0..size {
        let date = fixture_date() + Days::new(i as u64);
        history.push(Stock::new("TestStock", "TEST", date, high, low));
        let next = simulator.next_prices(high, low);
        high = next.high;
        low = next.low;
    }
    history
}

fn sort_fixture(size: usize, rng: &mut StdRng) -> DynamicArray<Stock> {
    (0..size)
        .map(|i| {
            let price = rng.gen_range(50.0..550.0);
            Stock::new(format!("Company{i}"), format!("STK{i}"), fixture_date(), price, price * 0.95)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn one_record_per_function_per_size() {
        let records = run_benchmarks(&[3, 7], 1);
        assert_eq!(records.len(), 6);

        let functions: Vec<BenchFunction> = records.iter().map(|r| r.function).collect();
        assert_eq!(
            functions,
            vec![
                BenchFunction::StockSearch,
                BenchFunction::BestBuySell,
                BenchFunction::StockSort,
                BenchFunction::StockSearch,
                BenchFunction::BestBuySell,
                BenchFunction::StockSort,
            ]
        );
        assert!(records[..3].iter().all(|r| r.input_size == 3));
        assert!(records[3..].iter().all(|r| r.input_size == 7));
        assert!(records.iter().all(|r| r.time_ms >= 0.0));
    }

    #[test]
    fn fixtures_have_requested_size() {
        let mut sim = PriceSimulator::seeded(4);
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(search_fixture(12).len(), 12);
        assert_eq!(history_fixture(12, &mut sim).len(), 12);
        assert_eq!(sort_fixture(12, &mut rng).len(), 12);

        let table = search_fixture(5);
        assert!(search_by_ticker(&table, "stock4").is_some());
        assert!(search_by_ticker(&table, "STOCK5").is_none());
    }

    #[test]
    fn results_csv_layout() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out").join("bench.csv");
        let records = vec![
            BenchmarkRecord {
                function: BenchFunction::StockSearch,
                input_size: 10,
                time_ms: 0.123456,
            },
            BenchmarkRecord {
                function: BenchFunction::StockSort,
                input_size: 1000,
                time_ms: 12.5,
            },
        ];
        write_results(&path, &records).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Function,InputSize,TimeMs",
                "StockSearch,10,0.1235",
                "StockSort,1000,12.5000",
            ]
        );
    }
}
