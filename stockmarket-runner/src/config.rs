//! Session configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields a working
//! setup rooted at `./data`:
//!
//! ```toml
//! data_dir = "data"
//! initial_cash = 100000.0
//! simulator_seed = 42
//!
//! [benchmark]
//! sizes = [10, 50, 100, 500, 1000]
//! output = "benchmark_results.csv"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stockmarket_core::PriceSimulator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where market data lives, how much cash a session starts with, and how
/// prices are simulated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketConfig {
    /// Directory holding the stock file, seed file and trade journal.
    pub data_dir: PathBuf,
    /// Chronological CSV of daily rows, created from the seed file on first run.
    pub stock_file: String,
    /// Initial market rows copied into the stock file on first run.
    pub seed_file: String,
    /// JSONL log of executed trades.
    pub journal_file: String,
    pub initial_cash: f64,
    /// Fixed seed for reproducible price paths. `None` seeds from OS entropy.
    pub simulator_seed: Option<u64>,
    pub benchmark: BenchmarkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Input sizes each benchmark is run at.
    pub sizes: Vec<usize>,
    /// CSV results file.
    pub output: PathBuf,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            stock_file: "stock_data.csv".into(),
            seed_file: "market2.txt".into(),
            journal_file: "transactions.jsonl".into(),
            initial_cash: 100_000.0,
            simulator_seed: None,
            benchmark: BenchmarkConfig::default(),
        }
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            sizes: vec![10, 50, 100, 500, 1000],
            output: PathBuf::from("benchmark_results.csv"),
        }
    }
}

impl MarketConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_cash.is_finite() || self.initial_cash < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "initial_cash must be a non-negative number, got {}",
                self.initial_cash
            )));
        }
        if self.stock_file.trim().is_empty() {
            return Err(ConfigError::Invalid("stock_file must not be empty".into()));
        }
        if self.benchmark.sizes.is_empty() {
            return Err(ConfigError::Invalid(
                "benchmark.sizes must list at least one size".into(),
            ));
        }
        if self.benchmark.sizes.contains(&0) {
            return Err(ConfigError::Invalid(
                "benchmark.sizes must all be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn stock_path(&self) -> PathBuf {
        self.data_dir.join(&self.stock_file)
    }

    pub fn seed_path(&self) -> PathBuf {
        self.data_dir.join(&self.seed_file)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.data_dir.join(&self.journal_file)
    }

    /// Price simulator honouring `simulator_seed`.
    pub fn simulator(&self) -> PriceSimulator {
        match self.simulator_seed {
            Some(seed) => PriceSimulator::seeded(seed),
            None => PriceSimulator::from_entropy(),
        }
    }
}
