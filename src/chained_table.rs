//! ChainedHashTable: separate chaining with growth on chain-length pressure.

use crate::config::{ChainScan, TableConfig};
use crate::error::{fatal, LookupError};
use crate::hashing::bucket_index;
use crate::inspect::Inspect;
use crate::stats::{AllocStats, Untracked};
use core::fmt;
use core::mem;
use log::{debug, trace};

type Link = Option<Box<Entry>>;

#[derive(Debug)]
struct Entry {
    key: String,
    value: i32,
    next: Link,
}

impl Entry {
    fn boxed<O: AllocStats>(key: String, value: i32, stats: &O) -> Box<Entry> {
        stats.entry_created();
        Box::new(Entry {
            key,
            value,
            next: None,
        })
    }
}

/// What `insert` did with the pair.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Placement {
    /// A new entry was linked into a chain.
    Inserted,
    /// An existing entry's value was overwritten in place.
    Updated,
}

/// Result of walking a non-empty chain, computed before mutating it.
enum Probe {
    /// The node at `depth` holds the key.
    Update { depth: usize },
    /// No checked node holds the key; the tail sits at `tail`.
    Append { tail: usize, pressure: bool },
}

/// Walk the chain starting at `head`.
///
/// In `Truncated` mode a node is compared only while it has a successor,
/// which leaves the tail unchecked. Pressure is raised when a node with a
/// successor is reached after `max_chain` nodes have already been walked.
fn probe(head: &Entry, key: &str, config: &TableConfig) -> Probe {
    let mut node = head;
    let mut depth = 0;
    let mut pressure = false;
    loop {
        let next = node.next.as_deref();
        let checked = next.is_some() || config.scan == ChainScan::Full;
        if checked && node.key == key {
            return Probe::Update { depth };
        }
        match next {
            Some(n) => {
                if depth >= config.max_chain {
                    pressure = true;
                }
                depth += 1;
                node = n;
            }
            None => {
                return Probe::Append {
                    tail: depth,
                    pressure,
                }
            }
        }
    }
}

fn nth_mut(head: &mut Entry, n: usize) -> Option<&mut Entry> {
    let mut node = head;
    for _ in 0..n {
        node = node.next.as_deref_mut()?;
    }
    Some(node)
}

/// Bucket array plus entry count. Kept apart from the table so a grow can
/// fill a fresh array with the same placement logic and swap it in.
struct Buckets {
    slots: Vec<Link>,
    len: usize,
}

impl Buckets {
    fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, len: 0 }
    }

    /// Update or append `key`. The flag is true when the walk saw enough
    /// pressure that the caller should grow; it is never set for an update
    /// or for the first entry of a bucket.
    fn place<K, O>(
        &mut self,
        key: K,
        value: i32,
        config: &TableConfig,
        stats: &O,
    ) -> (Placement, bool)
    where
        K: AsRef<str> + Into<String>,
        O: AllocStats,
    {
        let index = bucket_index(key.as_ref(), self.slots.len());
        let Some(head) = self.slots[index].as_deref_mut() else {
            self.slots[index] = Some(Entry::boxed(key.into(), value, stats));
            self.len += 1;
            return (Placement::Inserted, false);
        };

        match probe(head, key.as_ref(), config) {
            Probe::Update { depth } => {
                let node = nth_mut(head, depth).expect("probed node is in the chain");
                node.value = value;
                (Placement::Updated, false)
            }
            Probe::Append { tail, pressure } => {
                let node = nth_mut(head, tail).expect("probed tail is in the chain");
                node.next = Some(Entry::boxed(key.into(), value, stats));
                self.len += 1;
                (Placement::Inserted, pressure)
            }
        }
    }

    /// Detach every entry in slot order, then chain order, handing each to
    /// `f` with its `next` link cleared. Leaves every slot empty.
    fn detach_each<F>(&mut self, mut f: F)
    where
        F: FnMut(Box<Entry>),
    {
        for slot in self.slots.iter_mut() {
            let mut link = slot.take();
            while let Some(mut entry) = link {
                link = entry.next.take();
                f(entry);
            }
        }
        self.len = 0;
    }
}

/// Separate-chaining map from string keys to `i32` values.
///
/// ```
/// use chained_hashtable::{ChainedHashTable, LookupError};
///
/// let mut table = ChainedHashTable::new(8);
/// table.insert("A", 1);
/// table.insert("B", 2);
/// table.insert("C", 3);
/// assert_eq!(table.get("B"), Ok(2));
/// assert!(matches!(table.get("D"), Err(LookupError::NotFound { .. })));
/// ```
pub struct ChainedHashTable<O: AllocStats = Untracked> {
    buckets: Buckets,
    config: TableConfig,
    stats: O,
}

impl ChainedHashTable {
    /// Table with `capacity` buckets and default settings.
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(TableConfig::default().with_initial_capacity(capacity))
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_stats(config, Untracked)
    }
}

impl Default for ChainedHashTable {
    fn default() -> Self {
        Self::with_config(TableConfig::default())
    }
}

impl<O: AllocStats> ChainedHashTable<O> {
    /// Table with `capacity` buckets reporting to `stats`.
    pub fn with_stats(capacity: usize, stats: O) -> Self {
        Self::with_config_and_stats(
            TableConfig::default().with_initial_capacity(capacity),
            stats,
        )
    }

    /// Panics if `config.initial_capacity` or `config.max_chain` is zero.
    pub fn with_config_and_stats(config: TableConfig, stats: O) -> Self {
        config.validate();
        stats.table_created();
        Self {
            buckets: Buckets::new(config.initial_capacity),
            config,
            stats,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len
    }
    pub fn is_empty(&self) -> bool {
        self.buckets.len == 0
    }
    pub fn capacity(&self) -> usize {
        self.buckets.slots.len()
    }
    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn stats(&self) -> &O {
        &self.stats
    }

    /// Bucket `key` maps to under the current capacity.
    pub fn slot_of(&self, key: &str) -> usize {
        bucket_index(key, self.capacity())
    }

    /// Number of entries chained in `slot`. Zero for out-of-range slots.
    pub fn chain_len(&self, slot: usize) -> usize {
        let mut n = 0;
        let mut link = self.buckets.slots.get(slot).and_then(|l| l.as_deref());
        while let Some(entry) = link {
            n += 1;
            link = entry.next.as_deref();
        }
        n
    }

    /// Insert `key` or overwrite its value.
    ///
    /// With the default `ChainScan::Truncated` the tail of a chain is never
    /// compared, so re-inserting a key stored at a tail appends a second
    /// entry for it. Appending may grow the table; an update never does.
    pub fn insert(&mut self, key: &str, value: i32) -> Placement {
        let (placement, pressure) = self
            .buckets
            .place(key, value, &self.config, &self.stats);
        trace!("insert {:?} = {} -> {:?}", key, value, placement);
        if placement == Placement::Inserted && pressure {
            self.grow();
        }
        placement
    }

    /// Value of the first entry for `key` in chain order. Scans the whole
    /// chain, tail included.
    pub fn get(&self, key: &str) -> Result<i32, LookupError> {
        let mut link = self.buckets.slots[self.slot_of(key)].as_deref();
        if link.is_none() {
            return Err(LookupError::NotFound {
                key: key.to_string(),
                empty_bucket: true,
            });
        }
        while let Some(entry) = link {
            if entry.key == key {
                return Ok(entry.value);
            }
            link = entry.next.as_deref();
        }
        Err(LookupError::NotFound {
            key: key.to_string(),
            empty_bucket: false,
        })
    }

    /// Like `get`, but a miss prints `fatal: <reason>` and terminates the
    /// process with status 1.
    pub fn get_or_exit(&self, key: &str) -> i32 {
        match self.get(key) {
            Ok(v) => v,
            Err(e) => fatal(&e),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }

    /// Entries as `(slot, key, value)` in slot order, each chain head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.buckets.slots.iter().enumerate(),
            current: None,
            remaining: self.buckets.len,
        }
    }

    /// Display adapter that renders a bucket-by-bucket dump.
    pub fn inspect(&self) -> Inspect<'_, O> {
        Inspect::new(self)
    }

    /// Double the bucket count and re-place every entry with growth disabled.
    ///
    /// Entries are released from the old array and recreated in the new one
    /// in slot order, then chain order, so the resulting chain order follows
    /// migration order. The live table only switches arrays once migration
    /// has finished.
    fn grow(&mut self) {
        let old = self.capacity();
        let capacity = old.checked_mul(2).expect("bucket count overflow");
        debug!("rehash: capacity {} -> {}, {} entries", old, capacity, self.len());

        self.stats.table_created();
        let mut next = Buckets::new(capacity);
        let config = &self.config;
        let stats = &self.stats;
        self.buckets.detach_each(|entry| {
            stats.entry_released();
            let Entry { key, value, .. } = *entry;
            let _ = next.place(key, value, config, stats);
        });
        mem::swap(&mut self.buckets, &mut next);
        self.stats.table_released();

        debug!("rehash done: capacity {}, {} entries", self.capacity(), self.len());
    }
}

impl<O: AllocStats> Drop for ChainedHashTable<O> {
    fn drop(&mut self) {
        // Unlink iteratively; dropping a long chain recursively could
        // exhaust the stack.
        let stats = &self.stats;
        self.buckets.detach_each(|_entry| stats.entry_released());
        self.stats.table_released();
    }
}

impl<O: AllocStats> fmt::Debug for ChainedHashTable<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashTable")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Iterator over `(slot, key, value)` triples of a `ChainedHashTable`.
pub struct Iter<'a> {
    slots: core::iter::Enumerate<core::slice::Iter<'a, Link>>,
    current: Option<(usize, &'a Entry)>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a str, i32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((slot, entry)) = self.current {
                self.current = entry.next.as_deref().map(|n| (slot, n));
                self.remaining = self.remaining.saturating_sub(1);
                return Some((slot, entry.key.as_str(), entry.value));
            }
            let (slot, head) = self.slots.next()?;
            self.current = head.as_deref().map(|e| (slot, e));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl core::iter::FusedIterator for Iter<'_> {}

impl<'a, O: AllocStats> IntoIterator for &'a ChainedHashTable<O> {
    type Item = (usize, &'a str, i32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
