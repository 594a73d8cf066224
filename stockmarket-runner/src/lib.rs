//! Stock Market Runner: persistence, trading and benchmarks on top of the core.
//!
//! This crate builds on `stockmarket-core` to provide:
//! - TOML session configuration
//! - CSV market store with first-run seeding and day advance
//! - Trading desk executing trades against the session portfolio
//! - JSONL trade journal
//! - Wall-clock benchmarks with CSV output

pub mod benchmark;
pub mod config;
pub mod desk;
pub mod journal;
pub mod store;

pub use benchmark::{run_benchmarks, write_results, BenchFunction, BenchmarkError, BenchmarkRecord};
pub use config::{BenchmarkConfig, ConfigError, MarketConfig};
pub use desk::{HoldingRow, PortfolioReport, TradingDesk};
pub use journal::{JournalError, TradeJournal};
pub use store::{AdvanceSummary, InitOutcome, MarketStore, StoreError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<MarketConfig>();
        assert_sync::<MarketConfig>();
    }

    #[test]
    fn desk_is_send_sync() {
        assert_send::<TradingDesk>();
        assert_sync::<TradingDesk>();
        assert_send::<PortfolioReport>();
        assert_sync::<PortfolioReport>();
    }

    #[test]
    fn store_and_journal_are_send_sync() {
        assert_send::<MarketStore>();
        assert_sync::<MarketStore>();
        assert_send::<TradeJournal>();
        assert_sync::<TradeJournal>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<StoreError>();
        assert_sync::<StoreError>();
        assert_send::<BenchmarkError>();
        assert_sync::<BenchmarkError>();
    }
}
