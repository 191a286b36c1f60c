//! Shared helpers for benchmarks.
//!
//! Goals:
//! - Keep key generation deterministic across benches.
//! - Build pre-filled tables outside the timed section.

#![allow(dead_code)]

use residue_table::{BucketedTable, PartitionedAccess, Unsynchronized, WholeTableLock};

/// Generate `count` pseudo-random keys in `1..=n` from a fixed seed.
pub fn uniform_keys(n: i64, count: usize, seed: u64) -> Vec<i64> {
    let mut keys = Vec::with_capacity(count);
    let mut state = seed;
    let n = n.unsigned_abs().max(1);

    for _ in 0..count {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        #[allow(clippy::cast_possible_wrap)]
        keys.push((state % n) as i64 + 1);
    }
    keys
}

pub fn filled_unsynchronized(n: i64) -> BucketedTable<Unsynchronized> {
    let table: BucketedTable<Unsynchronized> = BucketedTable::new();
    for key in 1..=n {
        table.insert(key, 1);
    }
    table
}

pub fn filled_whole_table(n: i64) -> BucketedTable<WholeTableLock> {
    let table: BucketedTable<WholeTableLock> = BucketedTable::new();
    table.insert_batch((1..=n).map(|k| (k, 1)));
    table
}

pub fn filled_partitioned(n: i64) -> BucketedTable<PartitionedAccess> {
    let table: BucketedTable<PartitionedAccess> = BucketedTable::new();
    for key in 1..=n {
        table.insert(key, 1);
    }
    table
}
