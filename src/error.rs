//! Error type shared by construction and growth.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failures the table reports instead of aborting.
///
/// Every variant is produced before the table's visible state changes, so
/// an `Err` from [`crate::ChainedHashMap::try_grow`] leaves the table exactly
/// as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("failed to allocate a bucket array of {buckets} buckets")]
    BucketAllocation {
        buckets: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("growing a table of {capacity} buckets overflows usize")]
    CapacityOverflow { capacity: usize },
    #[error("growing to {requested} buckets exceeds the configured limit of {limit}")]
    CapacityLimit { requested: usize, limit: usize },
    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),
}
