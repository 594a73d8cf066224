//! DynamicArray: growable, index-addressable sequence with explicit capacity doubling.
//!
//! Backs per-ticker price histories and result lists. Insertion order is
//! significant: index 0 is the oldest row of a history.

use thiserror::Error;

/// Capacity of an array created with [`DynamicArray::new`].
const DEFAULT_CAPACITY: usize = 10;

/// Access outside `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} out of range for length {len}")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Ordered, 0-indexed sequence with amortized O(1) append.
///
/// Storage is reallocated only when `len == capacity`: a buffer of twice the
/// capacity is allocated, every element is moved across in order, and the old
/// buffer is released. `len <= capacity` holds at all times.
#[derive(Debug, Clone)]
pub struct DynamicArray<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> DynamicArray<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty array with room for `capacity` elements (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `value` at index `len()`, growing storage first when full.
    pub fn push(&mut self, value: T) {
        if self.items.len() == self.capacity {
            self.grow();
        }
        self.items.push(value);
    }

    pub fn get(&self, index: usize) -> Result<&T, IndexOutOfRange> {
        let len = self.items.len();
        self.items.get(index).ok_or(IndexOutOfRange { index, len })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfRange> {
        let len = self.items.len();
        self.items.get_mut(index).ok_or(IndexOutOfRange { index, len })
    }

    /// Replace the element at `index`, returning the previous value.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, IndexOutOfRange> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Exchange the elements at `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), IndexOutOfRange> {
        let len = self.items.len();
        for index in [a, b] {
            if index >= len {
                return Err(IndexOutOfRange { index, len });
            }
        }
        self.items.swap(a, b);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        let mut grown = Vec::with_capacity(new_capacity);
        grown.extend(self.items.drain(..));
        self.items = grown;
        self.capacity = new_capacity;
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_get_returns_value() {
        let mut array = DynamicArray::new();
        array.push("AAPL");
        array.push("MSFT");
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(0), Ok(&"AAPL"));
        assert_eq!(array.get(1), Ok(&"MSFT"));
    }

    #[test]
    fn growth_preserves_order_and_doubles_capacity() {
        let mut array = DynamicArray::with_capacity(2);
        for i in 0..5 {
            array.push(i);
        }
        // 2 -> 4 -> 8
        assert_eq!(array.capacity(), 8);
        assert_eq!(array.len(), 5);
        let collected: Vec<i32> = array.iter().copied().collect();
        assert_eq!(collected, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn zero_capacity_request_still_accepts_pushes() {
        let mut array = DynamicArray::with_capacity(0);
        assert_eq!(array.capacity(), 1);
        array.push(7);
        array.push(8);
        assert_eq!(array.as_slice(), &[7, 8]);
    }

    #[test]
    fn get_out_of_range_fails() {
        let array: DynamicArray<i32> = (0..3).collect();
        assert_eq!(array.get(3), Err(IndexOutOfRange { index: 3, len: 3 }));
        let empty: DynamicArray<i32> = DynamicArray::new();
        assert!(empty.get(0).is_err());
    }

    #[test]
    fn set_replaces_and_returns_previous() {
        let mut array: DynamicArray<i32> = (0..3).collect();
        assert_eq!(array.set(1, 42), Ok(1));
        assert_eq!(array.get(1), Ok(&42));
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn set_out_of_range_leaves_array_untouched() {
        let mut array: DynamicArray<i32> = (0..3).collect();
        let err = array.set(5, 9).unwrap_err();
        assert_eq!(err.index, 5);
        assert_eq!(err.len, 3);
        assert_eq!(array.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn swap_checks_both_indices() {
        let mut array: DynamicArray<i32> = (0..3).collect();
        array.swap(0, 2).unwrap();
        assert_eq!(array.as_slice(), &[2, 1, 0]);
        assert!(array.swap(0, 3).is_err());
        assert_eq!(array.as_slice(), &[2, 1, 0]);
    }

    #[test]
    fn error_message_names_index_and_length() {
        let err = IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "index 4 out of range for length 2");
    }
}
