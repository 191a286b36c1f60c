//! Standard memory orderings for chain and counter access.
//!
//! These constants keep ordering choices consistent across the crate and
//! make the intent clear at each access point.

use std::sync::atomic::Ordering;

/// Ordering for reading chain links while scanning a bucket.
/// Pairs with [`LINK_ORD`].
pub const READ_ORD: Ordering = Ordering::Acquire;

/// Ordering for publishing a node into a chain (head, tail or `next`).
/// A reader that observes the pointer also observes the node's key and value.
pub const LINK_ORD: Ordering = Ordering::Release;

/// Ordering for counter loads and stores.
///
/// Counters carry no data dependencies. Under the whole-table lock the mutex
/// provides the happens-before edge; elsewhere the value is allowed to race.
pub const COUNTER_ORD: Ordering = Ordering::Relaxed;

/// Ordering for chain access that already has `&mut` exclusivity.
pub const RELAXED: Ordering = Ordering::Relaxed;
