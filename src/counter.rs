//! Filepath: src/counter.rs
//!
//! Table-level aggregate cells (`node_count`, `sum`).
//!
//! A [`Counter`] does not pick its own update discipline. The caller chooses
//! one per call site:
//!
//! - [`Counter::racy_add`]: separate load and store. Two concurrent callers
//!   can read the same old value and one increment disappears. This is the
//!   lost update the unsynchronized table exists to show. Exact when the
//!   caller holds a lock that serializes every writer.
//! - [`Counter::atomic_add`]: a single `fetch_add`. Never loses an update and
//!   never blocks.
//!
//! Both are built on `AtomicI64`, so neither is a data race in the Rust
//! memory model. The racy variant loses updates, it does not corrupt memory.

use std::fmt as StdFmt;
use std::sync::atomic::AtomicI64;

use crate::ordering::COUNTER_ORD;


/// A shared `i64` aggregate with an explicit update discipline.
#[derive(Default)]
pub struct Counter {
    value: AtomicI64,
}

impl Counter {
    /// Create a counter starting at `initial`.
    #[must_use]
    pub const fn new(initial: i64) -> Self {
        Self {
            value: AtomicI64::new(initial),
        }
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> i64 {
        self.value.load(COUNTER_ORD)
    }

    /// Non-atomic read-modify-write: load, add, store.
    ///
    /// Concurrent callers lose updates. Returns the value this call stored,
    /// which may already be stale when the call returns.
    #[inline]
    pub fn racy_add(&self, delta: i64) -> i64 {
        let current: i64 = self.value.load(COUNTER_ORD);

        #[cfg(test)]
        crate::test_hooks::call_before_counter_store_hook();

        let next: i64 = current.wrapping_add(delta);
        self.value.store(next, COUNTER_ORD);
        next
    }

    /// Atomic read-modify-write. Never loses an update.
    #[inline]
    pub fn atomic_add(&self, delta: i64) -> i64 {
        self.value.fetch_add(delta, COUNTER_ORD).wrapping_add(delta)
    }

    /// Overwrite the value. Requires exclusive access.
    #[inline]
    pub fn set(&mut self, value: i64) {
        *self.value.get_mut() = value;
    }
}

impl StdFmt::Debug for Counter {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_tuple("Counter").field(&self.get()).finish()
    }
}
