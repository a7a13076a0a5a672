//! chained-hashmap: a single-threaded, separate-chaining hash table with
//! caller-supplied hashing and key comparison, and explicit hand-back of
//! every key and value the table lets go of.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash table whose ownership contract is visible in its types:
//!   whatever the table displaces or removes is returned to the caller,
//!   never dropped behind the caller's back.
//! - Layers:
//!   - Chains: singly linked node lists living in one generational arena
//!     (`slotmap`). Links are arena keys, not pointers; freed slots are
//!     recycled through the arena's free list.
//!   - BucketArray: `Vec` of chain heads indexed by `hash mod capacity`,
//!     plus the arena. Knows nothing about strategies; callers pass the
//!     hash and an equality predicate.
//!   - Resize: grow-only rehash of a BucketArray (doubling). Nodes are
//!     relinked into the new heads, not reallocated.
//!   - ChainedHashMap<K, V, H, C>: public API. Owns the strategies, runs
//!     the load-factor check after new insertions, and guards the
//!     operations that run them against reentrancy from the strategies.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync`, no locking.
//! - Keys are unique per the comparator, not per `Eq`.
//! - New entries become the head of their chain (LIFO per bucket).
//! - Load factor above 0.5 after a new insertion doubles the bucket
//!   count. The table never shrinks.
//!
//! Hasher and rehashing invariants
//! - Each node stores the hash computed when its key was stored; rehash
//!   uses the stored hash and never invokes the hasher. The hasher must
//!   therefore be stable for an unchanged key.
//! - Replacement overwrites the node in place and records the new key's
//!   hash; the node already sits in the bucket that hash maps to.
//!
//! Failure policy
//! - Construction reports a failed bucket allocation as `TableError`.
//! - Resize performs every fallible step (capacity arithmetic, the
//!   optional `max_buckets` ceiling, allocating the new heads) before it
//!   moves a single node, so a failed resize leaves the table exactly as it
//!   was. An insert whose resize fails still stores its entry.
//! - Node allocation itself is infallible, as for std collections.
//!
//! Reentrancy policy
//! - Every operation that runs the hasher or comparator, or moves nodes,
//!   enters a debug-only guard under its own name. A strategy that calls
//!   one of them on the same table panics in debug builds; release builds
//!   compile the guard away.
//! - Accessors that run no strategy (`len`, `capacity`, `chain_lengths`,
//!   iteration, `Debug`) are unguarded and safe to call from a strategy.
//!
//! Notes and non-goals
//! - No thread-safety, persistence or shrinking.
//! - Iteration order: bucket order, then chain order. Nothing stronger.
//! - `destroy` consumes the table; a second destroy does not compile.

mod bucket;
mod chain;
pub mod config;
pub mod error;
mod reentrancy;
mod resize;
pub mod strategy;
pub mod table;
mod table_proptest;

// Public surface
pub use config::{
    TableBuilder, TableConfig, DEFAULT_INITIAL_CAPACITY, GROWTH_FACTOR, MAX_LOAD_FACTOR,
};
pub use error::TableError;
pub use strategy::{EqComparator, HashBuilder, KeyComparator, KeyHasher, OrdComparator};
pub use table::{ChainedHashMap, Iter, Release, Retained};
