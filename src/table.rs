//! Filepath: src/table.rs
//! `BucketedTable` - three residue-class buckets behind a synchronization policy.
//!
//! The data-layout logic (routing, insert, lookup, drain, aggregates) lives
//! in the generic `impl<P: SyncPolicy>` block. What a caller may do
//! concurrently lives in the per-policy impl blocks, so a capability the
//! policy does not grant is a compile error, not a runtime check:
//!
//! ```rust,compile_fail
//! use residue_table::{BucketedTable, WholeTableLock};
//!
//! let table: BucketedTable<WholeTableLock> = BucketedTable::new();
//! table.insert(1, 1); // inserts go through `table.lock()`
//! ```

use std::fmt as StdFmt;
use std::marker::PhantomData;

use crate::bucket::Bucket;
use crate::counter::Counter;
use crate::node::Node;
use crate::policy::{SyncPolicy, Unsynchronized, WholeTableLock};
use crate::residue::{BUCKET_COUNT, Residue, bucket_index};
use crate::tracing_helpers::{debug_log, error_log, trace_log};

mod aggregate;
mod guard;



pub use guard::{BatchGuard, MergeGuard};

// ============================================================================
//  BucketedTable
// ============================================================================

/// A fixed three-bucket table keyed by `key mod 3`.
///
/// # Type Parameters
///
/// - `P` - the synchronization policy: [`Unsynchronized`],
///   [`WholeTableLock`] or [`PartitionedAccess`](crate::PartitionedAccess).
///
/// # Example
///
/// ```rust
/// use residue_table::{BucketedTable, Unsynchronized};
///
/// let table: BucketedTable<Unsynchronized> = BucketedTable::new();
/// for key in 1..=9 {
///     table.insert(key, 1);
/// }
///
/// assert_eq!(table.node_count(), 9);
/// assert_eq!(table.lookup(5).map(|n| n.value()), Some(1));
/// assert_eq!(table.total_value(), 9);
/// ```
pub struct BucketedTable<P: SyncPolicy> {
    /// Bucket `i` holds the keys with `key mod 3 == i`.
    buckets: [Bucket; BUCKET_COUNT],

    /// Inserts minus drains, bumped per the policy's discipline.
    node_count: Counter,

    /// Shared aggregate of node values.
    sum: Counter,

    /// Number of times the merge lock was taken (partitioned access only).
    merges: Counter,

    /// The policy's lock, `()` when there is none.
    lock: P::Lock,

    _policy: PhantomData<P>,
}

impl<P: SyncPolicy> BucketedTable<P> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: [Bucket::new(), Bucket::new(), Bucket::new()],
            node_count: Counter::new(0),
            sum: Counter::new(0),
            merges: Counter::new(0),
            lock: P::Lock::default(),
            _policy: PhantomData,
        }
    }

    /// Route `key` to its bucket.
    ///
    /// # Panics
    /// Panics if the routing function produced an index outside the three
    /// buckets. That means the hashing scheme itself is broken; there is no
    /// recovery.
    #[expect(clippy::panic, reason = "broken routing is a fatal invariant violation")]
    fn route(&self, key: i64) -> &Bucket {
        let index: usize = bucket_index(key);
        let Some(bucket) = self.buckets.get(index) else {
            error_log!(key, index, "BucketedTable: impossible bucket index");
            panic!("impossible bucket index {index} for key {key} (expected 0..{BUCKET_COUNT})");
        };
        bucket
    }

    /// Append a new node for `key` and bump `node_count`.
    ///
    /// Unguarded; each policy decides who may call this and when.
    fn insert_unguarded(&self, key: i64, value: i64) {
        self.route(key).append(Box::new(Node::new(key, value)));
        P::record_insert(&self.node_count);
        trace_log!(key, value, policy = P::NAME, "BucketedTable::insert");
    }

    /// First node with `key`, from bucket `key mod 3`. `None` if absent.
    ///
    /// Duplicate keys are kept; this returns the earliest inserted one.
    #[must_use]
    pub fn lookup(&self, key: i64) -> Option<&Node> {
        self.route(key).find_by_key(key)
    }

    /// The bucket for a residue class.
    #[inline]
    #[must_use]
    pub fn bucket(&self, residue: Residue) -> &Bucket {
        &self.buckets[residue.index()]
    }

    /// The bucket `key` routes to.
    #[inline]
    #[must_use]
    pub fn bucket_for(&self, key: i64) -> &Bucket {
        self.route(key)
    }

    /// All three buckets in residue order.
    #[inline]
    #[must_use]
    pub const fn buckets(&self) -> &[Bucket; BUCKET_COUNT] {
        &self.buckets
    }

    /// Detach the head of a residue class's bucket (FIFO) and uncount it.
    pub fn drain_head(&mut self, residue: Residue) -> Option<Box<Node>> {
        let node: Box<Node> = self.buckets[residue.index()].drain_head()?;
        let count: i64 = self.node_count.get();
        self.node_count.set(count - 1);
        Some(node)
    }

    /// Recorded number of inserted nodes.
    ///
    /// Below the number of inserts attempted when unsynchronized writers raced.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> i64 {
        self.node_count.get()
    }

    /// The shared aggregate `sum`.
    #[inline]
    #[must_use]
    pub fn sum(&self) -> i64 {
        self.sum.get()
    }

    /// Number of nodes reachable across all buckets. O(n).
    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.buckets.iter().map(Bucket::reachable_len).sum()
    }

    /// Single-threaded sum of every reachable node's value. O(n).
    ///
    /// The sequential reference the concurrent aggregations are checked against.
    #[must_use]
    pub fn total_value(&self) -> i64 {
        self.buckets
            .iter()
            .flat_map(Bucket::iter)
            .fold(0_i64, |acc, node| acc.wrapping_add(node.value()))
    }
}

impl<P: SyncPolicy> Default for BucketedTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SyncPolicy> StdFmt::Debug for BucketedTable<P> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        let counts: [usize; BUCKET_COUNT] = [
            self.buckets[0].len(),
            self.buckets[1].len(),
            self.buckets[2].len(),
        ];
        f.debug_struct("BucketedTable")
            .field("policy", &P::NAME)
            .field("node_count", &self.node_count())
            .field("sum", &self.sum())
            .field("bucket_counts", &counts)
            .finish_non_exhaustive()
    }
}

// ============================================================================
//  Unsynchronized
// ============================================================================

impl BucketedTable<Unsynchronized> {
    /// Insert `(key, value)` with no synchronization at all.
    ///
    /// Concurrent writers on the same bucket can lose nodes, and any two
    /// concurrent writers can lose `node_count` bumps.
    pub fn insert(&self, key: i64, value: i64) {
        self.insert_unguarded(key, value);
    }

    /// Add `delta` into `sum` with a non-atomic read-modify-write.
    ///
    /// Concurrent callers lose updates.
    pub fn add_to_sum(&self, delta: i64) {
        self.sum.racy_add(delta);
    }
}

// ============================================================================
//  WholeTableLock
// ============================================================================

impl BucketedTable<WholeTableLock> {
    /// Acquire the whole-table lock.
    ///
    /// Hold the returned guard for the worker's entire batch of operations,
    /// not per call. Every other writer blocks until it is dropped.
    pub fn lock(&self) -> BatchGuard<'_> {
        let guard = self.lock.lock();
        debug_log!(policy = WholeTableLock::NAME, "BucketedTable: batch lock acquired");
        BatchGuard::new(self, guard)
    }

    /// Insert every pair of `items` under one acquisition of the table lock.
    ///
    /// Returns the number of pairs inserted.
    pub fn insert_batch<I>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let mut batch: BatchGuard<'_> = self.lock();
        for (key, value) in items {
            batch.insert(key, value);
        }
        batch.inserted()
    }
}
