//! Partitioned access: lock-free inserts and map-reduce aggregation.
//!
//! # Map step
//! Each reader is restricted to one residue class. It walks that bucket and
//! accumulates a private subtotal with no shared state touched.
//!
//! # Reduce step
//! Each reader takes the table lock exactly once and adds its subtotal into
//! the shared `sum`. Lock acquisitions are bounded by the number of readers,
//! not the number of nodes.

use std::thread;

use super::{BucketedTable, MergeGuard};
use crate::node::Node;
use crate::policy::PartitionedAccess;
use crate::residue::Residue;
use crate::tracing_helpers::debug_log;

impl BucketedTable<PartitionedAccess> {
    /// Insert `(key, value)` without taking any lock.
    ///
    /// Exact only under the partitioning contract: concurrent writers must
    /// own distinct residue classes. `node_count` is bumped atomically, so it
    /// is exact across those writers.
    pub fn insert(&self, key: i64, value: i64) {
        self.insert_unguarded(key, value);
    }

    /// Acquire the merge lock.
    ///
    /// Bracket only the merge of a precomputed subtotal with the returned
    /// guard, never the scan that produced it.
    pub fn lock(&self) -> MergeGuard<'_> {
        let guard = self.lock.lock();
        self.merges.atomic_add(1);
        MergeGuard::new(self, guard)
    }

    /// Map step: private sum of the values in one residue class's bucket.
    ///
    /// Takes no lock and touches no shared counter.
    #[must_use]
    pub fn partial_sum(&self, residue: Residue) -> i64 {
        self.bucket(residue)
            .iter()
            .map(Node::value)
            .fold(0_i64, i64::wrapping_add)
    }

    /// Reduce step: add `subtotal` into the shared `sum` under one lock
    /// acquisition. Returns the `sum` after the merge.
    pub fn merge_partial(&self, subtotal: i64) -> i64 {
        self.lock().merge(subtotal)
    }

    /// Run the whole map-reduce: one reader thread per residue class, each
    /// merging once. Returns the shared `sum` after every reader joined.
    ///
    /// Adds onto whatever `sum` already holds.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub fn aggregate(&self) -> i64 {
        thread::scope(|scope| {
            for residue in Residue::ALL {
                scope.spawn(move || {
                    let subtotal: i64 = self.partial_sum(residue);
                    debug_log!(residue = residue.index(), subtotal, "aggregate: partial");
                    self.merge_partial(subtotal);
                });
            }
        });
        self.sum()
    }

    /// Number of times the merge lock was acquired.
    #[must_use]
    pub fn merge_count(&self) -> i64 {
        self.merges.get()
    }
}
