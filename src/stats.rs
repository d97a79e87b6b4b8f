//! Allocation observers.
//!
//! A table reports every construction and release of itself and of its
//! entries to an `AllocStats` implementation chosen at construction time.
//! The default, `Untracked`, compiles to nothing. `Counters` keeps live
//! counts that tests can assert on to check that nothing leaks, including
//! across a grow.
//!
//! Accounting follows the reference layout: a table is two allocations
//! (its header and its bucket array) and an entry is two (the node and its
//! key copy), so while anything is alive
//! `allocations == 2 * tables + 2 * entries`.

use core::cell::Cell;
use std::rc::Rc;

/// Receives lifecycle events from a table.
pub trait AllocStats {
    fn table_created(&self);
    fn table_released(&self);
    fn entry_created(&self);
    fn entry_released(&self);
}

/// No-op observer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Untracked;

impl AllocStats for Untracked {
    #[inline]
    fn table_created(&self) {}
    #[inline]
    fn table_released(&self) {}
    #[inline]
    fn entry_created(&self) {}
    #[inline]
    fn entry_released(&self) {}
}

/// Single-threaded live counters.
///
/// Share one instance between a table and the test that inspects it by
/// handing the table `&Counters` or `Rc<Counters>`.
#[derive(Debug, Default)]
pub struct Counters {
    allocations: Cell<usize>,
    tables: Cell<usize>,
    entries: Cell<usize>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live allocations.
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    /// Live table instances.
    pub fn tables(&self) -> usize {
        self.tables.get()
    }

    /// Live entries.
    pub fn entries(&self) -> usize {
        self.entries.get()
    }

    /// True once everything that was counted has been released.
    pub fn is_balanced(&self) -> bool {
        self.allocations() == 0 && self.tables() == 0 && self.entries() == 0
    }

    /// Zero all counters.
    pub fn reset(&self) {
        self.allocations.set(0);
        self.tables.set(0);
        self.entries.set(0);
    }
}

#[inline]
fn bump(c: &Cell<usize>, by: usize) {
    c.set(c.get() + by);
}

#[inline]
fn drop_by(c: &Cell<usize>, by: usize, what: &str) {
    let n = c.get();
    assert!(n >= by, "{} counter underflow", what);
    c.set(n - by);
}

impl AllocStats for Counters {
    fn table_created(&self) {
        bump(&self.allocations, 2);
        bump(&self.tables, 1);
    }

    fn table_released(&self) {
        drop_by(&self.allocations, 2, "allocation");
        drop_by(&self.tables, 1, "table");
    }

    fn entry_created(&self) {
        bump(&self.allocations, 2);
        bump(&self.entries, 1);
    }

    fn entry_released(&self) {
        drop_by(&self.allocations, 2, "allocation");
        drop_by(&self.entries, 1, "entry");
    }
}

impl<T: AllocStats + ?Sized> AllocStats for &T {
    #[inline]
    fn table_created(&self) {
        (**self).table_created()
    }
    #[inline]
    fn table_released(&self) {
        (**self).table_released()
    }
    #[inline]
    fn entry_created(&self) {
        (**self).entry_created()
    }
    #[inline]
    fn entry_released(&self) {
        (**self).entry_released()
    }
}

impl<T: AllocStats + ?Sized> AllocStats for Rc<T> {
    #[inline]
    fn table_created(&self) {
        (**self).table_created()
    }
    #[inline]
    fn table_released(&self) {
        (**self).table_released()
    }
    #[inline]
    fn entry_created(&self) {
        (**self).entry_created()
    }
    #[inline]
    fn entry_released(&self) {
        (**self).entry_released()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_live_objects() {
        let c = Counters::new();
        c.table_created();
        c.entry_created();
        c.entry_created();
        assert_eq!(c.tables(), 1);
        assert_eq!(c.entries(), 2);
        assert_eq!(c.allocations(), 6);

        c.entry_released();
        assert_eq!(c.entries(), 1);
        assert_eq!(c.allocations(), 4);

        c.entry_released();
        c.table_released();
        assert!(c.is_balanced());
    }

    #[test]
    #[should_panic(expected = "entry counter underflow")]
    fn underflow_panics() {
        let c = Counters::new();
        c.table_created();
        c.entry_released();
    }

    #[test]
    fn reset_zeroes_everything() {
        let c = Counters::new();
        c.table_created();
        c.entry_created();
        c.reset();
        assert!(c.is_balanced());
    }

    #[test]
    fn shared_handles_forward_to_the_same_counters() {
        let c = Rc::new(Counters::new());
        let by_rc = c.clone();
        let by_ref = &*c;
        by_rc.table_created();
        by_ref.entry_created();
        assert_eq!(c.tables(), 1);
        assert_eq!(c.entries(), 1);
    }
}
