//! Owned containers backing price histories and ticker lookups.

pub mod dynamic_array;
pub mod hash_table;

pub use dynamic_array::{DynamicArray, IndexOutOfRange};
pub use hash_table::HashTable;
