//! BucketArray: chain heads indexed by `hash mod capacity`, plus the node
//! arena the chains live in.

use crate::chain::{Chains, Head, Node, NodeKey, Walk};
use crate::error::TableError;
use core::mem;

pub(crate) struct BucketArray<K, V> {
    pub(crate) heads: Vec<Head>,
    pub(crate) chains: Chains<K, V>,
}

#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// Allocate `capacity` empty chain heads, reporting allocation failure
/// instead of aborting.
pub(crate) fn alloc_heads(capacity: usize) -> Result<Vec<Head>, TableError> {
    let mut heads = Vec::new();
    heads
        .try_reserve_exact(capacity)
        .map_err(|source| TableError::BucketAllocation {
            buckets: capacity,
            source,
        })?;
    heads.resize(capacity, None);
    Ok(heads)
}

impl<K, V> BucketArray<K, V> {
    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::InvalidConfig("capacity must be non-zero"));
        }
        Ok(Self {
            heads: alloc_heads(capacity)?,
            chains: Chains::new(),
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.heads.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.chains.len()
    }

    pub(crate) fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    #[inline]
    pub(crate) fn index_of(&self, hash: u64) -> usize {
        bucket_index(hash, self.heads.len())
    }

    /// Walk the chain `hash` maps to and return the first node whose key
    /// satisfies `matches`.
    pub(crate) fn find<F>(&self, hash: u64, matches: F) -> Option<NodeKey>
    where
        F: FnMut(&K) -> bool,
    {
        let head = self.heads[self.index_of(hash)];
        self.chains.find(head, matches)
    }

    pub(crate) fn push(&mut self, hash: u64, key: K, value: V) -> NodeKey {
        let i = self.index_of(hash);
        self.chains.push_front(&mut self.heads[i], key, value, hash)
    }

    /// Overwrite a node's key and value in place and return the old pair.
    ///
    /// `node` must have been found under `hash`, so it already sits in the
    /// bucket `hash` maps to; recording `hash` keeps later rehashes in line
    /// with the new key.
    pub(crate) fn replace(&mut self, node: NodeKey, hash: u64, key: K, value: V) -> (K, V) {
        let n = self.chains.node_mut(node);
        n.hash = hash;
        (mem::replace(&mut n.key, key), mem::replace(&mut n.value, value))
    }

    pub(crate) fn remove(&mut self, hash: u64, node: NodeKey) -> Option<(K, V)> {
        let i = self.index_of(hash);
        self.chains
            .unlink(&mut self.heads[i], node)
            .map(|n| (n.key, n.value))
    }

    /// Free every node, handing each key/value pair to `f` in bucket order.
    pub(crate) fn drain_into<F>(&mut self, mut f: F)
    where
        F: FnMut(K, V),
    {
        for head in self.heads.iter_mut() {
            while let Some(Node { key, value, .. }) = self.chains.take_front(head) {
                f(key, value);
            }
        }
    }

    pub(crate) fn chain_lengths(&self) -> Vec<usize> {
        self.heads
            .iter()
            .map(|&h| self.chains.walk(h).count())
            .collect()
    }

    /// Panics unless every node is reachable exactly once, from the bucket
    /// its stored hash maps to.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut seen = std::collections::HashSet::new();
        for (i, &head) in self.heads.iter().enumerate() {
            for (k, n) in self.chains.walk(head) {
                assert!(seen.insert(k), "node reachable twice");
                assert_eq!(self.index_of(n.hash), i, "node in the wrong bucket");
            }
        }
        assert_eq!(seen.len(), self.len(), "unreachable nodes in the arena");
    }
}

/// Bucket-order iterator over every node: buckets in index order, each
/// chain head first.
pub(crate) struct NodeIter<'a, K, V> {
    heads: core::slice::Iter<'a, Head>,
    chains: &'a Chains<K, V>,
    walk: Walk<'a, K, V>,
}

impl<'a, K, V> NodeIter<'a, K, V> {
    pub(crate) fn new(buckets: &'a BucketArray<K, V>) -> Self {
        Self {
            heads: buckets.heads.iter(),
            chains: &buckets.chains,
            walk: Walk::empty(&buckets.chains),
        }
    }
}

impl<'a, K, V> Iterator for NodeIter<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, n)) = self.walk.next() {
                return Some(n);
            }
            let &head = self.heads.next()?;
            self.walk = self.chains.walk(head);
        }
    }
}
