//! Bucket dump.

use crate::chained_table::ChainedHashTable;
use crate::stats::AllocStats;
use core::fmt;

/// `Display` adapter returned by `ChainedHashTable::inspect`.
///
/// Renders one line per entry as `<slot>: <key> : <value>`, indented by two
/// spaces per position in its chain, between begin/end banners, followed by
/// the capacity and length.
pub struct Inspect<'a, O: AllocStats> {
    table: &'a ChainedHashTable<O>,
}

impl<'a, O: AllocStats> Inspect<'a, O> {
    pub(crate) fn new(table: &'a ChainedHashTable<O>) -> Self {
        Self { table }
    }
}

impl<O: AllocStats> fmt::Display for Inspect<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===hash_inspect begin===")?;
        let mut prev = None;
        let mut depth = 0;
        for (slot, key, value) in self.table.iter() {
            if prev == Some(slot) {
                depth += 1;
            } else {
                depth = 0;
                prev = Some(slot);
            }
            writeln!(f, "{:indent$}{}: {} : {}", "", slot, key, value, indent = depth * 2)?;
        }
        writeln!(
            f,
            "capa: {}, len: {}",
            self.table.capacity(),
            self.table.len()
        )?;
        writeln!(f, "===hash_inspect end===")
    }
}
