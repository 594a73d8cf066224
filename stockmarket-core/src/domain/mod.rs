//! Domain types: daily stock records, trade log entries, portfolio rules.

pub mod portfolio;
pub mod stock;
pub mod transaction;

pub use portfolio::{Portfolio, TradeError};
pub use stock::{Stock, DATE_FORMAT};
pub use transaction::{TradeSide, Transaction};
