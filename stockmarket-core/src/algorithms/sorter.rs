//! In-place quicksort of stocks by daily high price.
//!
//! Lomuto partition with the last element of each range as pivot. Not stable.
//! Already-sorted or reverse-sorted input degrades to O(n²) comparisons; the
//! market snapshots this runs on hold at most a few thousand tickers. Recursion
//! always descends into the smaller partition, so stack depth stays O(log n)
//! even in the quadratic case.

use crate::collections::DynamicArray;
use crate::domain::Stock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceOrder {
    /// Low to high.
    #[default]
    Ascending,
    /// High to low.
    Descending,
}

impl PriceOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Partition predicate: whether `price` belongs left of the pivot.
    fn precedes_pivot(self, price: f64, pivot: f64) -> bool {
        match self {
            Self::Ascending => price <= pivot,
            Self::Descending => price >= pivot,
        }
    }
}

/// Sort `stocks` in place by `high_price`.
pub fn sort_by_price(stocks: &mut DynamicArray<Stock>, order: PriceOrder) {
    quicksort(stocks.as_mut_slice(), order);
}

fn quicksort(mut items: &mut [Stock], order: PriceOrder) {
    while items.len() > 1 {
        let pivot = partition(items, order);
        let (left, right) = std::mem::take(&mut items).split_at_mut(pivot);
        let right = &mut right[1..];

        if left.len() < right.len() {
            quicksort(left, order);
            items = right;
        } else {
            quicksort(right, order);
            items = left;
        }
    }
}

/// Lomuto partition around the last element. Returns the pivot's final index.
fn partition(items: &mut [Stock], order: PriceOrder) -> usize {
    let last = items.len() - 1;
    let pivot_price = items[last].high_price;
    let mut store = 0;

    for j in 0..last {
        if order.precedes_pivot(items[j].high_price, pivot_price) {
            items.swap(store, j);
            store += 1;
        }
    }
    items.swap(store, last);
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stocks(highs: &[f64]) -> DynamicArray<Stock> {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        highs
            .iter()
            .enumerate()
            .map(|(i, &h)| Stock::new(format!("Company {i}"), format!("T{i}"), date, h, h * 0.95))
            .collect()
    }

    fn highs(array: &DynamicArray<Stock>) -> Vec<f64> {
        array.iter().map(|s| s.high_price).collect()
    }

    #[test]
    fn ascending_sort() {
        let mut array = stocks(&[30.0, 10.0, 50.0, 20.0, 40.0]);
        sort_by_price(&mut array, PriceOrder::Ascending);
        assert_eq!(highs(&array), vec![10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn descending_sort() {
        let mut array = stocks(&[30.0, 10.0, 50.0, 20.0, 40.0]);
        sort_by_price(&mut array, PriceOrder::Descending);
        assert_eq!(highs(&array), vec![50.0, 40.0, 30.0, 20.0, 10.0]);
    }

    #[test]
    fn duplicates_and_already_sorted_input() {
        let mut array = stocks(&[5.0, 5.0, 1.0, 5.0, 1.0]);
        sort_by_price(&mut array, PriceOrder::Ascending);
        assert_eq!(highs(&array), vec![1.0, 1.0, 5.0, 5.0, 5.0]);

        sort_by_price(&mut array, PriceOrder::Ascending);
        assert_eq!(highs(&array), vec![1.0, 1.0, 5.0, 5.0, 5.0]);
    }

    #[test]
    fn empty_and_single_are_noops() {
        let mut empty = stocks(&[]);
        sort_by_price(&mut empty, PriceOrder::Descending);
        assert!(empty.is_empty());

        let mut single = stocks(&[7.0]);
        sort_by_price(&mut single, PriceOrder::Descending);
        assert_eq!(highs(&single), vec![7.0]);
    }

    #[test]
    fn large_reverse_sorted_input_completes() {
        let prices: Vec<f64> = (0..5_000).rev().map(f64::from).collect();
        let mut array = stocks(&prices);
        sort_by_price(&mut array, PriceOrder::Ascending);
        let sorted = highs(&array);
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sorted.len(), 5_000);
    }

    #[test]
    fn from_ascending_flag() {
        assert_eq!(PriceOrder::from_ascending(true), PriceOrder::Ascending);
        assert_eq!(PriceOrder::from_ascending(false), PriceOrder::Descending);
    }
}
