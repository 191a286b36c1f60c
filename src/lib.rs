//! # `residue_table`
//!
//! A small concurrent key-value container built from singly-linked buckets,
//! for studying how synchronization granularity affects correctness and
//! throughput.
//!
//! Keys are routed to one of exactly three buckets by `key mod 3`. The same
//! table layout is offered under three synchronization policies:
//!
//! | Policy | Writers | Result |
//! |--------|---------|--------|
//! | [`Unsynchronized`] | any thread, any time | lost nodes and lost counts when writers overlap |
//! | [`WholeTableLock`] | one batch at a time | exact, fully serialized |
//! | [`PartitionedAccess`] | one writer per residue class | exact, fully parallel |
//!
//! Partitioned access also provides the map-reduce aggregation pattern:
//! each reader sums its own residue class privately, then merges once
//! under the table lock.
//!
//! ## Thread Safety
//!
//! `BucketedTable<P>` is `Send + Sync` for every policy. Races in the
//! unsynchronized paths lose updates; they are never data races in the
//! Rust memory model. Chain links and counters are atomics updated with
//! separate loads and stores where the race is the point.
//!
//! ```rust
//! use residue_table::{BucketedTable, PartitionedAccess, Residue};
//! use std::thread;
//!
//! let table: BucketedTable<PartitionedAccess> = BucketedTable::new();
//!
//! // Writer r only touches keys with key mod 3 == r.
//! thread::scope(|s| {
//!     for residue in Residue::ALL {
//!         let table = &table;
//!         s.spawn(move || {
//!             for key in residue.keys_in(1..=9) {
//!                 table.insert(key, 1);
//!             }
//!         });
//!     }
//! });
//!
//! assert_eq!(table.node_count(), 9);
//! assert_eq!(table.aggregate(), 9);
//! ```
//!
//! ## Non-goals
//!
//! - Not a general-purpose hash map: the bucket count is fixed at three.
//! - No resizing, no removal except FIFO drain, no key updates.

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod tracing_helpers;

pub mod bucket;
pub mod counter;
pub mod node;
pub mod ordering;
pub mod policy;
pub mod residue;
pub mod table;

#[cfg(test)]
pub mod test_hooks;

// Re-export main types for convenience
pub use bucket::Bucket;
pub use counter::Counter;
pub use node::Node;
pub use policy::{PartitionedAccess, SyncPolicy, Unsynchronized, WholeTableLock};
pub use residue::{BUCKET_COUNT, Residue, ResidueError};
pub use table::{BatchGuard, BucketedTable, MergeGuard};
