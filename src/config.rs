//! Table configuration and the builder used to construct tables.

use crate::error::TableError;
use crate::strategy::{EqComparator, HashBuilder, KeyComparator, KeyHasher};
use crate::table::ChainedHashMap;

/// Bucket count of a freshly created table.
pub const DEFAULT_INITIAL_CAPACITY: usize = 7;

/// A new insertion that leaves `len / capacity` above this triggers a resize.
pub const MAX_LOAD_FACTOR: f64 = 0.5;

/// Each resize multiplies the bucket count by this.
pub const GROWTH_FACTOR: usize = 2;

/// Construction-time settings. Strategies are supplied separately.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of buckets the table starts with. Must be non-zero.
    pub initial_capacity: usize,
    /// Optional ceiling on the bucket count. Growth that would exceed it is
    /// refused and the table keeps its current buckets (chains just get
    /// longer).
    pub max_buckets: Option<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_buckets: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), TableError> {
        if self.initial_capacity == 0 {
            return Err(TableError::InvalidConfig("initial capacity must be non-zero"));
        }
        if matches!(self.max_buckets, Some(limit) if limit < self.initial_capacity) {
            return Err(TableError::InvalidConfig(
                "max_buckets must be at least the initial capacity",
            ));
        }
        Ok(())
    }
}

/// Builder for [`ChainedHashMap`].
///
/// ```
/// use chained_hashmap::TableBuilder;
///
/// let mut table = TableBuilder::new()
///     .with_capacity(16)
///     .with_hasher(|k: &u32| u64::from(*k))
///     .with_comparator(|a: &u32, b: &u32| a.cmp(b))
///     .try_build::<u32, &str>()
///     .unwrap();
/// assert!(table.insert(3, "three").is_none());
/// assert_eq!(table.capacity(), 16);
/// ```
#[derive(Clone, Debug)]
pub struct TableBuilder<H = HashBuilder, C = EqComparator> {
    config: TableConfig,
    hasher: H,
    comparator: C,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            config: TableConfig::default(),
            hasher: HashBuilder::default(),
            comparator: EqComparator,
        }
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, C> TableBuilder<H, C> {
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.config.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_buckets(mut self, limit: usize) -> Self {
        self.config.max_buckets = Some(limit);
        self
    }

    pub fn with_hasher<H2>(self, hasher: H2) -> TableBuilder<H2, C> {
        TableBuilder {
            config: self.config,
            hasher,
            comparator: self.comparator,
        }
    }

    pub fn with_comparator<C2>(self, comparator: C2) -> TableBuilder<H, C2> {
        TableBuilder {
            config: self.config,
            hasher: self.hasher,
            comparator,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Build the table, reporting an invalid configuration or a failed
    /// bucket allocation.
    pub fn try_build<K, V>(self) -> Result<ChainedHashMap<K, V, H, C>, TableError>
    where
        H: KeyHasher<K>,
        C: KeyComparator<K>,
    {
        ChainedHashMap::from_parts(self.config, self.hasher, self.comparator)
    }

    /// Build the table.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or the initial bucket array
    /// cannot be allocated; use [`TableBuilder::try_build`] to handle either.
    pub fn build<K, V>(self) -> ChainedHashMap<K, V, H, C>
    where
        H: KeyHasher<K>,
        C: KeyComparator<K>,
    {
        match self.try_build() {
            Ok(table) => table,
            Err(e) => panic!("cannot build table: {e}"),
        }
    }
}
