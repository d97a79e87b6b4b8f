//! Construction-time configuration for `ChainedHashTable`.

/// Default number of buckets.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Default chain-length pressure threshold.
pub const DEFAULT_MAX_CHAIN: usize = 3;

/// How `insert` looks for an existing key in a non-empty chain.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ChainScan {
    /// Compare only nodes that have a successor; the tail of a chain is
    /// never compared, so re-inserting a key that sits at the tail appends
    /// a duplicate entry. This is the historical behavior.
    #[default]
    Truncated,
    /// Compare every node including the tail, so re-inserting any present
    /// key overwrites its value.
    Full,
}

/// Table parameters.
///
/// ```
/// use chained_hashtable::{ChainScan, ChainedHashTable, TableConfig};
///
/// let config = TableConfig::default()
///     .with_initial_capacity(4)
///     .with_scan(ChainScan::Full);
/// let table: ChainedHashTable = ChainedHashTable::with_config(config);
/// assert_eq!(table.capacity(), 4);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TableConfig {
    /// Number of buckets allocated at construction. Must be at least one.
    pub initial_capacity: usize,
    /// A chain walk that has already passed this many nodes marks the table
    /// for growth. Must be at least one.
    pub max_chain: usize,
    /// Match strategy for `insert`.
    pub scan: ChainScan,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_chain: DEFAULT_MAX_CHAIN,
            scan: ChainScan::default(),
        }
    }
}

impl TableConfig {
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    pub fn with_scan(mut self, scan: ChainScan) -> Self {
        self.scan = scan;
        self
    }

    /// Panics on a configuration that would break `capacity >= 1` or
    /// disable growth altogether.
    pub(crate) fn validate(&self) {
        assert!(self.initial_capacity > 0, "capacity must be positive");
        assert!(self.max_chain > 0, "max_chain must be positive");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_program() {
        let c = TableConfig::default();
        assert_eq!(c.initial_capacity, 8);
        assert_eq!(c.max_chain, 3);
        assert_eq!(c.scan, ChainScan::Truncated);
    }

    #[test]
    fn setters_chain() {
        let c = TableConfig::default()
            .with_initial_capacity(2)
            .with_max_chain(5)
            .with_scan(ChainScan::Full);
        assert_eq!(
            c,
            TableConfig {
                initial_capacity: 2,
                max_chain: 5,
                scan: ChainScan::Full,
            }
        );
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn zero_capacity_rejected() {
        TableConfig::default().with_initial_capacity(0).validate();
    }

    #[test]
    #[should_panic(expected = "max_chain must be positive")]
    fn zero_max_chain_rejected() {
        TableConfig::default().with_max_chain(0).validate();
    }
}
