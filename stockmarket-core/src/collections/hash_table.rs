//! HashTable: separate-chaining hash map with eager doubling at a 0.75 load factor.
//!
//! Layout: an owned array of bucket heads, each head owning a singly linked
//! chain of entries (`Option<Box<Entry>>`). Nothing outside the table holds a
//! reference to a node, so resizing can move whole entries between chains
//! without cloning keys or values.
//!
//! Iteration order follows bucket order and changes after a resize. Callers
//! must not rely on it.

use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use super::dynamic_array::DynamicArray;

/// Bucket count of a table created with [`HashTable::new`].
const DEFAULT_CAPACITY: usize = 16;

/// Load factor threshold as a ratio: `len / capacity` never exceeds 3 / 4.
const LOAD_FACTOR_NUM: usize = 3;
const LOAD_FACTOR_DEN: usize = 4;

/// Deterministic hasher so bucket placement is reproducible across runs.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<Box<Entry<K, V>>>,
}

type Bucket<K, V> = Option<Box<Entry<K, V>>>;

/// Chained hash map from `K` to `V`.
///
/// Keys must provide a `Hash` consistent with `Eq`. Lookups return `Option`
/// so an absent key is never confused with a present zero or empty value.
pub struct HashTable<K, V, S = DefaultHashBuilder> {
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    hash_builder: S,
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, || None);
    buckets
}

impl<K, V> HashTable<K, V, DefaultHashBuilder> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a table with `capacity` buckets (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S> HashTable<K, V, S> {
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            buckets: empty_buckets(capacity.max(1)),
            len: 0,
            hash_builder,
        }
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Iterate over `(key, value)` pairs in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.len,
        }
    }

    /// Snapshot of all keys, in bucket order.
    pub fn keys(&self) -> DynamicArray<K>
    where
        K: Clone,
    {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of all values, in bucket order.
    pub fn values(&self) -> DynamicArray<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Bucket for `key`: the hash folded onto its upper half, reduced modulo capacity.
    ///
    /// The hash is an unsigned `u64`, so the index is never negative.
    fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        let h = self.hash_builder.hash_one(key);
        let folded = h ^ (h >> 16);
        (folded % self.buckets.len() as u64) as usize
    }

    /// Insert or overwrite. Returns the previous value when `key` was present.
    ///
    /// Overwriting keeps the entry in place and leaves `len` unchanged. A new
    /// key is prepended to its chain, after doubling capacity as often as
    /// needed to keep the load factor at or below the threshold.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }

        while (self.len + 1) * LOAD_FACTOR_DEN > self.buckets.len() * LOAD_FACTOR_NUM {
            self.grow();
        }

        let index = self.bucket_index(&key);
        let next = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Entry { key, value, next }));
        self.len += 1;
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut current = self.buckets[self.bucket_index(key)].as_deref();
        while let Some(entry) = current {
            if entry.key.borrow() == key {
                return Some(&entry.value);
            }
            current = entry.next.as_deref();
        }
        None
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let mut current = self.buckets[index].as_deref_mut();
        while let Some(entry) = current {
            if entry.key.borrow() == key {
                return Some(&mut entry.value);
            }
            current = entry.next.as_deref_mut();
        }
        None
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Unlink and return the value for `key`. Missing keys return `None`.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let mut link = &mut self.buckets[index];
        while link
            .as_ref()
            .is_some_and(|entry| entry.key.borrow() != key)
        {
            link = &mut link.as_mut()?.next;
        }

        let mut removed = link.take()?;
        *link = removed.next.take();
        self.len -= 1;
        Some(removed.value)
    }

    /// Double the bucket count and rehash every entry into the new array.
    fn grow(&mut self) {
        let new_capacity = self.buckets.len() * 2;
        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_capacity));

        for mut chain in old {
            while let Some(mut entry) = chain {
                chain = entry.next.take();
                let index = self.bucket_index(&entry.key);
                entry.next = self.buckets[index].take();
                self.buckets[index] = Some(entry);
            }
        }
    }
}

impl<K, V> Default for HashTable<K, V, DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

impl<K, V, S> Clone for HashTable<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        let mut table = Self::with_capacity_and_hasher(self.capacity(), self.hash_builder.clone());
        for (key, value) in self.iter() {
            table.insert(key.clone(), value.clone());
        }
        table
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over a [`HashTable`].
pub struct Iter<'a, K, V> {
    buckets: std::slice::Iter<'a, Bucket<K, V>>,
    chain: Option<&'a Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain {
                self.chain = entry.next.as_deref();
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
