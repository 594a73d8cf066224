//! Stock market core: the containers and algorithms the simulator runs on.
//!
//! - Collections: chained [`HashTable`](collections::HashTable) and growable
//!   [`DynamicArray`](collections::DynamicArray)
//! - Domain: daily [`Stock`](domain::Stock) records, trade log entries and
//!   [`Portfolio`](domain::Portfolio) buy/sell rules
//! - Algorithms: quicksort by price, ticker search, best buy/sell window
//! - Simulator: seeded random walk producing the next day's high/low
//!
//! Everything here is synchronous, in-memory and free of I/O.

pub mod algorithms;
pub mod collections;
pub mod domain;
pub mod simulator;

pub use algorithms::{find_best_window, search_by_ticker, sort_by_price, PriceOrder, TradeWindow};
pub use collections::{DynamicArray, HashTable, IndexOutOfRange};
pub use domain::{Portfolio, Stock, TradeError, TradeSide, Transaction, DATE_FORMAT};
pub use simulator::{DailyRange, PriceSimulator};
