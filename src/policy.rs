//! Filepath: src/policy.rs
//!
//! Synchronization strategies for [`BucketedTable`](crate::BucketedTable).
//!
//! The three policies share every byte of data layout. They differ in
//! which lock the table owns, how the table-level `node_count` is bumped,
//! and which methods exist on `BucketedTable<Policy>`:
//!
//! | Policy | Lock | Insert | `sum` update |
//! |--------|------|--------|--------------|
//! | [`Unsynchronized`] | none | `&self`, racy count | `add_to_sum`, racy |
//! | [`WholeTableLock`] | one mutex, held per batch | only via [`BatchGuard`](crate::BatchGuard) | only via the guard |
//! | [`PartitionedAccess`] | one mutex, held per merge | `&self`, atomic count | one `merge` per reader |
//!
//! The capability flags on [`SyncPolicy`] let generic code ask a policy what
//! its callers must hold instead of inspecting types at runtime.

use parking_lot::Mutex;

use crate::counter::Counter;

mod private {
    pub trait Sealed {}
}

/// A synchronization strategy for a bucketed table.
///
/// Sealed: the three policies in this module are the whole set.
///
/// Generic drivers read the capability flags to decide what a worker must
/// hold before it touches the table:
///
/// ```rust
/// use residue_table::{PartitionedAccess, SyncPolicy, Unsynchronized, WholeTableLock};
///
/// fn worker_plan<P: SyncPolicy>() -> &'static str {
///     match (P::INSERT_REQUIRES_LOCK, P::SUM_REQUIRES_LOCK) {
///         (true, _) => "hold the lock for the whole batch",
///         (false, true) => "insert freely, lock once to merge",
///         (false, false) => "no lock anywhere",
///     }
/// }
///
/// assert_eq!(worker_plan::<WholeTableLock>(), "hold the lock for the whole batch");
/// assert_eq!(worker_plan::<PartitionedAccess>(), "insert freely, lock once to merge");
/// assert_eq!(worker_plan::<Unsynchronized>(), "no lock anywhere");
/// ```
pub trait SyncPolicy: private::Sealed + Send + Sync + 'static {
    /// Human-readable policy name, used in `Debug` output and logs.
    const NAME: &'static str;

    /// Whether inserts must happen while the table lock is held.
    const INSERT_REQUIRES_LOCK: bool;

    /// Whether updates to the shared `sum` must happen while the table lock is held.
    const SUM_REQUIRES_LOCK: bool;

    /// The lock owned by a table under this policy.
    type Lock: Default + Send + Sync;

    /// Bump the table-level node count for one insert.
    fn record_insert(node_count: &Counter);
}

/// No lock at all.
///
/// Exact only with a single writer or with writers pre-partitioned onto
/// disjoint buckets. Otherwise appends and counter bumps race and updates
/// are lost without any error being raised.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsynchronized;

/// One mutex for the whole table, held by each writer for its whole batch.
///
/// Fully serializes writers against each other for the duration of the
/// run. Results are exact; concurrent speedup is gone.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeTableLock;

/// Lock-free inserts under a partitioning contract, plus one guarded merge
/// per reader.
///
/// # Partitioning contract
/// Each concurrent writer is assigned a distinct residue class `r` and only
/// inserts keys with `key mod 3 == r`. The contract is documented, not
/// checked: two writers sharing a residue class race exactly like
/// [`Unsynchronized`] on that bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionedAccess;

impl private::Sealed for Unsynchronized {}
impl private::Sealed for WholeTableLock {}
impl private::Sealed for PartitionedAccess {}

impl SyncPolicy for Unsynchronized {
    const NAME: &'static str = "unsynchronized";
    const INSERT_REQUIRES_LOCK: bool = false;
    const SUM_REQUIRES_LOCK: bool = false;

    type Lock = ();

    #[inline]
    fn record_insert(node_count: &Counter) {
        node_count.racy_add(1);
    }
}

impl SyncPolicy for WholeTableLock {
    const NAME: &'static str = "whole-table-lock";
    const INSERT_REQUIRES_LOCK: bool = true;
    const SUM_REQUIRES_LOCK: bool = true;

    type Lock = Mutex<()>;

    /// Called with the table lock held, which serializes every bump.
    #[inline]
    fn record_insert(node_count: &Counter) {
        node_count.racy_add(1);
    }
}

impl SyncPolicy for PartitionedAccess {
    const NAME: &'static str = "partitioned-access";
    const INSERT_REQUIRES_LOCK: bool = false;
    const SUM_REQUIRES_LOCK: bool = true;

    type Lock = Mutex<()>;

    /// Writers on disjoint buckets still share this counter.
    #[inline]
    fn record_insert(node_count: &Counter) {
        node_count.atomic_add(1);
    }
}
