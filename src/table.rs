//! ChainedHashMap: public table surface over a bucket array of chains.

use crate::bucket::{BucketArray, NodeIter};
use crate::chain::NodeKey;
use crate::config::{TableBuilder, TableConfig, MAX_LOAD_FACTOR};
use crate::error::TableError;
use crate::reentrancy::OpGuard;
use crate::strategy::{EqComparator, HashBuilder, KeyComparator, KeyHasher};
use core::fmt;
use core::hash::Hash;
use log::{debug, trace, warn};

/// A separate-chaining hash table with injected hasher and comparator.
///
/// Ownership of keys and values moves into the table on [`insert`] and back
/// out to the caller on replacement, [`remove`] and [`destroy`]. The table
/// never drops a displaced key or value on the caller's behalf.
///
/// [`insert`]: ChainedHashMap::insert
/// [`remove`]: ChainedHashMap::remove
/// [`destroy`]: ChainedHashMap::destroy
pub struct ChainedHashMap<K, V, H = HashBuilder, C = EqComparator> {
    buckets: BucketArray<K, V>,
    hasher: H,
    comparator: C,
    config: TableConfig,
    guard: OpGuard,
}

/// Which stored parts [`ChainedHashMap::destroy`] drops. Anything not
/// released is handed back in [`Retained`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Release {
    pub keys: bool,
    pub values: bool,
}

impl Release {
    pub const NONE: Release = Release::new(false, false);
    pub const KEYS: Release = Release::new(true, false);
    pub const VALUES: Release = Release::new(false, true);
    pub const ALL: Release = Release::new(true, true);

    pub const fn new(keys: bool, values: bool) -> Self {
        Self { keys, values }
    }
}

/// Keys and values a destroyed table did not release. Entry `i` of `keys`
/// and `values` belong together when both are retained.
#[derive(Debug)]
pub struct Retained<K, V> {
    pub keys: Vec<K>,
    pub values: Vec<V>,
}

impl<K, V> Retained<K, V> {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.values.is_empty()
    }
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Empty table with the default hasher, `Eq` comparison and
    /// [`DEFAULT_INITIAL_CAPACITY`](crate::DEFAULT_INITIAL_CAPACITY) buckets.
    pub fn new() -> Self {
        TableBuilder::new().build()
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H, C> ChainedHashMap<K, V, H, C> {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.len() == 0
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    pub fn load_factor(&self) -> f64 {
        self.buckets.load_factor()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Length of every bucket's chain, in bucket order.
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets.chain_lengths()
    }

    /// Entries in bucket order; within a bucket, most recently chained first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: NodeIter::new(&self.buckets),
            remaining: self.buckets.len(),
        }
    }

    /// Mutable access to every value. Order is unspecified.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.buckets
            .chains
            .nodes_mut()
            .map(|n| (&n.key, &mut n.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Tear the table down, dropping keys and/or values as `release` asks
    /// and handing back everything else.
    ///
    /// Consumes the table, so it runs at most once.
    pub fn destroy(mut self, release: Release) -> Retained<K, V> {
        let _g = self.guard.enter("destroy");
        let len = self.buckets.len();
        let mut retained = Retained {
            keys: Vec::with_capacity(if release.keys { 0 } else { len }),
            values: Vec::with_capacity(if release.values { 0 } else { len }),
        };
        self.buckets.drain_into(|key, value| {
            if release.keys {
                drop(key);
            } else {
                retained.keys.push(key);
            }
            if release.values {
                drop(value);
            } else {
                retained.values.push(value);
            }
        });
        trace!(
            "destroyed table of {len} entries (released keys: {}, values: {})",
            release.keys,
            release.values
        );
        retained
    }
}

impl<K, V, H, C> ChainedHashMap<K, V, H, C>
where
    H: KeyHasher<K>,
    C: KeyComparator<K>,
{
    /// Empty table with the given strategies and default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the initial bucket array cannot be allocated.
    pub fn with_strategies(hasher: H, comparator: C) -> Self {
        TableBuilder::new()
            .with_hasher(hasher)
            .with_comparator(comparator)
            .build()
    }

    /// Empty table with the given strategies, reporting allocation failure.
    pub fn try_with_strategies(hasher: H, comparator: C) -> Result<Self, TableError> {
        Self::from_parts(TableConfig::default(), hasher, comparator)
    }

    pub(crate) fn from_parts(
        config: TableConfig,
        hasher: H,
        comparator: C,
    ) -> Result<Self, TableError> {
        config.validate()?;
        let buckets = BucketArray::try_with_capacity(config.initial_capacity)?;
        trace!("created table with {} buckets", config.initial_capacity);
        Ok(Self {
            buckets,
            hasher,
            comparator,
            config,
            guard: OpGuard::new(),
        })
    }

    fn locate(&self, key: &K) -> Option<(u64, NodeKey)> {
        let hash = self.hasher.hash_key(key);
        let node = self
            .buckets
            .find(hash, |stored| self.comparator.same_key(key, stored))?;
        Some((hash, node))
    }

    /// Store `key -> value`.
    ///
    /// Returns `None` for a new key. If the comparator finds an equal key
    /// already stored, the stored key and value are overwritten and the
    /// displaced pair is returned; the caller now owns it.
    ///
    /// A new key that pushes the load factor above
    /// [`MAX_LOAD_FACTOR`](crate::MAX_LOAD_FACTOR) grows the table before
    /// returning. If growth is refused the entry is still stored and the
    /// table keeps its current buckets.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let _g = self.guard.enter("insert");
        let hash = self.hasher.hash_key(&key);
        let comparator = &self.comparator;
        if let Some(node) = self
            .buckets
            .find(hash, |stored| comparator.same_key(&key, stored))
        {
            return Some(self.buckets.replace(node, hash, key, value));
        }

        self.buckets.push(hash, key, value);
        if self.buckets.load_factor() > MAX_LOAD_FACTOR {
            match self.buckets.grow(self.config.max_buckets) {
                Ok(new_capacity) => debug!(
                    "grew table to {new_capacity} buckets ({} entries)",
                    self.buckets.len()
                ),
                Err(e @ TableError::CapacityLimit { .. }) => trace!("not growing table: {e}"),
                Err(e) => warn!(
                    "table stays at {} buckets after failed resize: {e}",
                    self.buckets.capacity()
                ),
            }
        }
        None
    }

    fn entry(&self, key: &K) -> Option<(&K, &V)> {
        let (_, node) = self.locate(key)?;
        let n = self.buckets.chains.node(node);
        Some((&n.key, &n.value))
    }

    pub fn lookup(&self, key: &K) -> Option<&V> {
        let _g = self.guard.enter("lookup");
        self.entry(key).map(|(_, v)| v)
    }

    /// The stored key and its value. The stored key may differ from `key`
    /// in anything the comparator ignores.
    pub fn lookup_entry(&self, key: &K) -> Option<(&K, &V)> {
        let _g = self.guard.enter("lookup_entry");
        self.entry(key)
    }

    pub fn lookup_mut(&mut self, key: &K) -> Option<&mut V> {
        let _g = self.guard.enter("lookup_mut");
        let (_, node) = self.locate(key)?;
        Some(&mut self.buckets.chains.node_mut(node).value)
    }

    pub fn is_present(&self, key: &K) -> bool {
        let _g = self.guard.enter("is_present");
        self.locate(key).is_some()
    }

    /// Remove the entry equal to `key` and hand its stored key and value
    /// back to the caller. `None` leaves the table untouched.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let _g = self.guard.enter("remove");
        let (hash, node) = self.locate(key)?;
        self.buckets.remove(hash, node)
    }

    /// Insert every pair in order and return the displaced pairs, oldest
    /// displacement first. Nothing is dropped by the table.
    pub fn insert_all<I>(&mut self, pairs: I) -> Vec<(K, V)>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        pairs
            .into_iter()
            .filter_map(|(k, v)| self.insert(k, v))
            .collect()
    }

    /// Double the bucket count now and rehash every entry.
    ///
    /// On `Err` the table is unchanged.
    pub fn try_grow(&mut self) -> Result<(), TableError> {
        let _g = self.guard.enter("try_grow");
        let old_capacity = self.buckets.capacity();
        let new_capacity = self.buckets.grow(self.config.max_buckets)?;
        debug!("grew table from {old_capacity} to {new_capacity} buckets");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.buckets.assert_consistent();
    }
}

impl<K, V, H, C> fmt::Debug for ChainedHashMap<K, V, H, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, H, C> IntoIterator for &'a ChainedHashMap<K, V, H, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(&K, &V)` in bucket order.
pub struct Iter<'a, K, V> {
    nodes: NodeIter<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let n = self.nodes.next()?;
        self.remaining -= 1;
        Some((&n.key, &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
