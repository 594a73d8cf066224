//! Analytics over stock snapshots and price histories.

pub mod best_window;
pub mod search;
pub mod sorter;

pub use best_window::{find_best_window, TradeWindow};
pub use search::search_by_ticker;
pub use sorter::{sort_by_price, PriceOrder};
