//! Hashing and key-equality strategies injected at construction time.
//!
//! The table never looks inside a key itself: it asks a [`KeyHasher`] for
//! a `u64` and a [`KeyComparator`] whether two keys are the same. Both are
//! fixed for the lifetime of a table; rehashing relies on the hasher
//! producing the same value for an unchanged key.

use core::cmp::Ordering;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Maps a key to a 64-bit hash. Must be deterministic for an unchanged key;
/// collisions are fine.
pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

/// Decides whether two keys denote the same entry.
///
/// Only `Ordering::Equal` is significant to the table; the direction of a
/// non-equal result is never used.
pub trait KeyComparator<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;

    #[inline]
    fn same_key(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Equal
    }
}

impl<K, F> KeyHasher<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

impl<K, F> KeyComparator<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Adapts any [`BuildHasher`] into a [`KeyHasher`] for `K: Hash`.
#[derive(Clone, Debug, Default)]
pub struct HashBuilder<S = DefaultHashBuilder>(pub S);

impl<S> HashBuilder<S> {
    pub fn new(build_hasher: S) -> Self {
        HashBuilder(build_hasher)
    }
}

impl<K, S> KeyHasher<K> for HashBuilder<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}

/// Keys are the same iff `K: Eq` says so.
#[derive(Copy, Clone, Debug, Default)]
pub struct EqComparator;

impl<K: Eq + ?Sized> KeyComparator<K> for EqComparator {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        if a == b {
            Ordering::Equal
        } else {
            Ordering::Less
        }
    }

    #[inline]
    fn same_key(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Keys are the same iff `K: Ord` compares them equal.
#[derive(Copy, Clone, Debug, Default)]
pub struct OrdComparator;

impl<K: Ord + ?Sized> KeyComparator<K> for OrdComparator {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}
