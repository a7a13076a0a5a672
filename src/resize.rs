//! Grow-only rehash of a bucket array.
//!
//! Every step that can fail (capacity arithmetic, the configured ceiling,
//! allocating the new heads) runs before the first node moves. Once nodes
//! start moving nothing can fail, so a resize either completes or leaves the
//! array exactly as it was.

use crate::bucket::{alloc_heads, bucket_index, BucketArray};
use crate::config::GROWTH_FACTOR;
use crate::error::TableError;

/// Capacity after one growth step, or why there is none.
pub(crate) fn next_capacity(capacity: usize, max_buckets: Option<usize>) -> Result<usize, TableError> {
    let requested = capacity
        .checked_mul(GROWTH_FACTOR)
        .ok_or(TableError::CapacityOverflow { capacity })?;
    match max_buckets {
        Some(limit) if requested > limit => Err(TableError::CapacityLimit { requested, limit }),
        _ => Ok(requested),
    }
}

impl<K, V> BucketArray<K, V> {
    /// Double the number of buckets and move every node to the bucket its
    /// stored hash maps to under the new capacity. Returns the new capacity.
    ///
    /// Nodes are relinked, not reallocated, and the hasher is not consulted.
    pub(crate) fn grow(&mut self, max_buckets: Option<usize>) -> Result<usize, TableError> {
        let new_capacity = next_capacity(self.capacity(), max_buckets)?;
        let mut new_heads = alloc_heads(new_capacity)?;

        let len = self.len();
        for head in self.heads.iter_mut() {
            while let Some(node) = self.chains.pop_front(head) {
                let i = bucket_index(self.chains.node(node).hash, new_capacity);
                self.chains.relink_front(&mut new_heads[i], node);
            }
        }
        self.heads = new_heads;
        debug_assert_eq!(self.len(), len, "resize must not gain or lose entries");
        Ok(new_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_capacity_doubles() {
        assert_eq!(next_capacity(7, None), Ok(14));
        assert_eq!(next_capacity(7, Some(14)), Ok(14));
    }

    #[test]
    fn next_capacity_respects_limit_and_overflow() {
        assert_eq!(
            next_capacity(7, Some(13)),
            Err(TableError::CapacityLimit {
                requested: 14,
                limit: 13
            })
        );
        assert_eq!(
            next_capacity(usize::MAX / 2 + 1, None),
            Err(TableError::CapacityOverflow {
                capacity: usize::MAX / 2 + 1
            })
        );
    }

    /// Invariant: growth keeps every node, places each under
    /// `hash mod new_capacity`, and keeps values attached to their keys.
    #[test]
    fn grow_rehashes_every_node() {
        let mut b: BucketArray<u64, String> = BucketArray::try_with_capacity(7).unwrap();
        for k in 0..20u64 {
            b.push(k * 3, k, format!("v{k}"));
        }
        assert_eq!(b.grow(None), Ok(14));
        assert_eq!(b.capacity(), 14);
        assert_eq!(b.len(), 20);
        b.assert_consistent();
        for k in 0..20u64 {
            let n = b.find(k * 3, |stored| *stored == k).expect("key survives resize");
            assert_eq!(b.chains.node(n).value, format!("v{k}"));
        }
    }

    /// Invariant: a refused resize leaves capacity, chains and contents as
    /// they were.
    #[test]
    fn refused_grow_leaves_array_untouched() {
        let mut b: BucketArray<u64, u64> = BucketArray::try_with_capacity(7).unwrap();
        for k in 0..6u64 {
            b.push(k, k, k + 100);
        }
        let lengths = b.chain_lengths();
        assert!(matches!(b.grow(Some(7)), Err(TableError::CapacityLimit { .. })));
        assert_eq!(b.capacity(), 7);
        assert_eq!(b.chain_lengths(), lengths);
        b.assert_consistent();
        for k in 0..6u64 {
            assert!(b.find(k, |s| *s == k).is_some());
        }
    }

    #[test]
    fn grow_empty_array() {
        let mut b: BucketArray<u8, u8> = BucketArray::try_with_capacity(1).unwrap();
        assert_eq!(b.grow(None), Ok(2));
        assert_eq!(b.len(), 0);
        assert_eq!(b.chain_lengths(), [0, 0]);
    }
}
