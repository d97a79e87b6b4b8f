//! chained-hashtable: a single-threaded, separate-chaining map from string
//! keys to `i32` values that doubles its bucket count under chain-length
//! pressure.
//!
//! Internal Design:
//!
//! Summary
//! - `ChainedHashTable<O>` owns a `Vec` of bucket slots. Each slot is
//!   either empty or owns the head of a singly linked chain; every entry
//!   owns its successor, so dropping a slot releases its whole chain.
//! - Keys map to slots with `hashing(key) % capacity`, an add-then-multiply
//!   by 31 hash over the key's bytes in wrapping 32-bit arithmetic.
//! - `O: AllocStats` observes allocations. `Untracked` is free; `Counters`
//!   records live tables, entries and allocations for leak checks.
//!
//! Insert
//! - An empty slot takes the new entry as its head and never grows.
//! - Otherwise the chain is probed immutably first, then mutated at the
//!   probed depth. With `ChainScan::Truncated` (the default) only nodes that
//!   have a successor are compared, so the tail of a chain is never matched:
//!   writing a key that currently sits at a tail appends a second entry for
//!   it. `ChainScan::Full` compares every node.
//! - A walk that reaches a node with a successor after `max_chain` nodes
//!   (3 by default) raises pressure; if the insert then appended, the table
//!   grows.
//!
//! Grow
//! - Builds a bucket array of twice the capacity and re-places every entry
//!   through the same insert path with growth disabled, in slot order then
//!   chain order. The live table swaps arrays only after migration, so no
//!   half-migrated state is observable.
//!
//! Lookup
//! - `get` scans the whole chain, tail included, and returns the first
//!   match. Misses are `LookupError::NotFound`; `get_or_exit` terminates
//!   the process instead, matching the historical fatal behavior.
//!
//! Constraints and non-goals
//! - Single-threaded; mutation needs `&mut self`, no internal locking.
//! - No removal, no persistence, string keys only.
//! - Logging goes through the `log` facade: `debug!` on every grow,
//!   `trace!` per insert, `error!` before `get_or_exit` exits.

mod chained_table;
mod chained_table_proptest;
mod config;
mod error;
mod hashing;
mod inspect;
pub mod stats;

// Public surface
pub use chained_table::{ChainedHashTable, Iter, Placement};
pub use config::{ChainScan, TableConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_CHAIN};
pub use error::LookupError;
pub use hashing::hashing;
pub use inspect::Inspect;
pub use stats::{AllocStats, Counters, Untracked};
