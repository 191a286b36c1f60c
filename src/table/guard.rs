//! Lock guards for the two locking policies.
//!
//! Both guards hold the table's single mutex for as long as they live and
//! release it on drop (panic-safe). What they differ in is the scope they
//! are meant to bracket:
//!
//! - [`BatchGuard`] brackets a worker's whole batch of inserts.
//! - [`MergeGuard`] brackets only the merge of one precomputed subtotal.
//!
//! Operations that need the lock take the guard as proof, so they cannot be
//! called without it.

use parking_lot::MutexGuard;

use super::BucketedTable;
use crate::node::Node;
use crate::policy::{PartitionedAccess, WholeTableLock};
use crate::tracing_helpers::debug_log;

// ============================================================================
//  BatchGuard
// ============================================================================

/// Proof that the whole-table lock is held.
///
/// Obtained from [`BucketedTable::<WholeTableLock>::lock`]. Meant to be held
/// across a worker's entire batch; dropping it after every call would turn
/// the coarse lock into per-call locking.
///
/// Guards are `!Send`: the lock is released on the thread that took it.
#[must_use = "dropping the guard releases the lock immediately"]
pub struct BatchGuard<'a> {
    table: &'a BucketedTable<WholeTableLock>,
    inserted: usize,
    _lock: MutexGuard<'a, ()>,
}

impl<'a> BatchGuard<'a> {
    pub(super) fn new(
        table: &'a BucketedTable<WholeTableLock>,
        lock: MutexGuard<'a, ()>,
    ) -> Self {
        Self {
            table,
            inserted: 0,
            _lock: lock,
        }
    }

    /// Insert `(key, value)`. Exact: no other writer can run concurrently.
    pub fn insert(&mut self, key: i64, value: i64) {
        self.table.insert_unguarded(key, value);
        self.inserted += 1;
    }

    /// Add `delta` into the table's `sum`.
    pub fn add_to_sum(&mut self, delta: i64) {
        self.table.sum.racy_add(delta);
    }

    /// Look up `key` while holding the lock.
    #[must_use]
    pub fn lookup(&self, key: i64) -> Option<&'a Node> {
        self.table.lookup(key)
    }

    /// Number of inserts made through this guard.
    #[must_use]
    pub const fn inserted(&self) -> usize {
        self.inserted
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        debug_log!(inserted = self.inserted, "BucketedTable: batch lock released");
    }
}

// ============================================================================
//  MergeGuard
// ============================================================================

/// Proof that the partitioned table's merge lock is held.
///
/// Obtained from [`BucketedTable::<PartitionedAccess>::lock`]. A reader takes
/// it exactly once, after computing its private subtotal.
#[must_use = "dropping the guard releases the lock immediately"]
pub struct MergeGuard<'a> {
    table: &'a BucketedTable<PartitionedAccess>,
    _lock: MutexGuard<'a, ()>,
}

impl<'a> MergeGuard<'a> {
    pub(super) fn new(
        table: &'a BucketedTable<PartitionedAccess>,
        lock: MutexGuard<'a, ()>,
    ) -> Self {
        Self { table, _lock: lock }
    }

    /// Add a reader's private subtotal into the shared `sum`.
    ///
    /// Returns the `sum` after the merge.
    pub fn merge(&mut self, subtotal: i64) -> i64 {
        let sum: i64 = self.table.sum.racy_add(subtotal);
        debug_log!(subtotal, sum, "BucketedTable: merged partial sum");
        sum
    }
}
