//! Filepath: src/bucket.rs
//!
//! Singly-linked bucket chain with tail append and FIFO drain.
//!
//! # Concurrency Model
//! 1. `append` and `find_by_key` take `&self`. Any number of threads may call
//!    them at once.
//! 2. `append` is a plain load of `tail` followed by plain stores of the link
//!    and the new `tail`. There is no compare-and-swap, so two appends that
//!    read the same tail both link behind it and one node falls off the chain
//!    while `count` still grows for both. Callers that need exact results
//!    must serialize appends to a bucket (lock, or one writer per bucket).
//! 3. `drain_head` and `Drop` take `&mut self`. Nodes are only freed there,
//!    so a reference from `find_by_key` or `iter` stays valid for the borrow.
//!
//! Nodes that fell off the chain in a lost append are unreachable and are
//! never freed.

use std::fmt as StdFmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize};

use crate::counter::Counter;
use crate::node::Node;
use crate::ordering::{COUNTER_ORD, LINK_ORD, READ_ORD, RELAXED};
use crate::tracing_helpers::{trace_log, warn_log};

/// A singly-linked chain of [`Node`]s.
///
/// Doubles as a single-consumer FIFO queue: [`Bucket::drain_head`] returns
/// nodes in the order they were appended.
///
/// # Example
///
/// ```rust
/// use residue_table::{Bucket, Node};
///
/// let mut bucket = Bucket::new();
/// for key in [1, 4, 7] {
///     bucket.append(Box::new(Node::new(key, 1)));
/// }
///
/// assert_eq!(bucket.find_by_key(4).map(Node::value), Some(1));
/// assert_eq!(bucket.drain_head().map(|n| n.key()), Some(1));
/// assert_eq!(bucket.len(), 2);
/// ```
pub struct Bucket {
    /// First node, the owning entry point of the chain.
    head: AtomicPtr<Node>,

    /// Last node. Non-owning.
    tail: AtomicPtr<Node>,

    /// Number of appends minus number of drains.
    count: AtomicUsize,

    /// Legacy per-bucket accumulator.
    sum: Counter,

    /// The bucket owns the nodes reachable from `head`.
    _owns: PhantomData<Box<Node>>,
}

impl Bucket {
    /// Create an empty bucket.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: AtomicPtr::new(ptr::null_mut()),
            tail: AtomicPtr::new(ptr::null_mut()),
            count: AtomicUsize::new(0),
            sum: Counter::new(0),
            _owns: PhantomData,
        }
    }

    /// Append `node` at the tail. O(1).
    ///
    /// Any existing successor of `node` is discarded from its link; the node
    /// joins this chain detached.
    ///
    /// Not safe for concurrent callers on the same bucket: see the module
    /// docs. The race loses nodes, it never frees or aliases them.
    pub fn append(&self, mut node: Box<Node>) {
        *node.next.get_mut() = ptr::null_mut();
        trace_log!(key = node.key(), "Bucket::append");
        let new_ptr: *mut Node = Box::into_raw(node);

        let tail: *mut Node = self.tail.load(READ_ORD);

        #[cfg(test)]
        crate::test_hooks::call_before_link_hook();

        if tail.is_null() {
            self.head.store(new_ptr, LINK_ORD);
        } else {
            // SAFETY: a non-null tail points at a node appended to this bucket.
            // Nodes are freed only through `&mut self`, and `drain_head`
            // never leaves `tail` pointing at a node it handed out.
            unsafe { (*tail).next.store(new_ptr, LINK_ORD) };
        }
        self.tail.store(new_ptr, LINK_ORD);

        let count: usize = self.count.load(COUNTER_ORD);
        self.count.store(count + 1, COUNTER_ORD);
    }

    /// First node whose key equals `key`, scanning from head. O(n).
    #[must_use]
    pub fn find_by_key(&self, key: i64) -> Option<&Node> {
        self.iter().find(|node| node.key() == key)
    }

    /// Detach and return the head node, or `None` if the bucket is empty. O(1).
    ///
    /// The returned node has no successor. Repeated calls on an empty bucket
    /// keep returning `None`.
    pub fn drain_head(&mut self) -> Option<Box<Node>> {
        let head: *mut Node = *self.head.get_mut();
        if head.is_null() {
            return None;
        }

        // SAFETY: `head` was produced by `Box::into_raw` in `append` and is
        // reachable only through this chain. `&mut self` rules out every
        // concurrent reader and writer.
        let mut node: Box<Node> = unsafe { Box::from_raw(head) };
        let next: *mut Node = mem::replace(node.next.get_mut(), ptr::null_mut());

        *self.head.get_mut() = next;
        if next.is_null() {
            *self.tail.get_mut() = ptr::null_mut();
        } else if *self.tail.get_mut() == head {
            // Only reachable after a lost append left `tail` behind the real end.
            let last: *mut Node = Self::last_from(next);
            warn_log!(key = node.key(), "Bucket::drain_head: repaired stale tail");
            *self.tail.get_mut() = last;
        }

        let count: &mut usize = self.count.get_mut();
        *count = count.saturating_sub(1);

        Some(node)
    }

    /// Drain every node, adding each value into this bucket's [`sum`](Self::sum).
    ///
    /// Returns the accumulated sum after the drain.
    pub fn drain_into_sum(&mut self) -> i64 {
        while let Some(node) = self.drain_head() {
            self.sum.racy_add(node.value());
        }
        self.sum.get()
    }

    /// Recorded number of nodes (appends minus drains).
    ///
    /// Equals [`reachable_len`](Self::reachable_len) unless concurrent appends
    /// raced on this bucket.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.count.load(COUNTER_ORD)
    }

    /// Whether no node is reachable from head.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.load(READ_ORD).is_null()
    }

    /// Number of nodes actually reachable from head. O(n).
    #[must_use]
    pub fn reachable_len(&self) -> usize {
        self.iter().count()
    }

    /// Iterate the chain from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        // SAFETY: see `Node::next`; the same borrow argument covers `head`.
        let first: Option<&Node> = unsafe { self.head.load(READ_ORD).as_ref() };
        std::iter::successors(first, |&node| node.next())
    }

    /// The legacy per-bucket accumulator.
    #[inline]
    #[must_use]
    pub fn sum(&self) -> i64 {
        self.sum.get()
    }

    /// Add `delta` to the legacy accumulator with a non-atomic read-modify-write.
    #[inline]
    pub fn add_to_sum(&self, delta: i64) {
        self.sum.racy_add(delta);
    }

    /// Walk from `start` (non-null) to the last reachable node.
    fn last_from(start: *mut Node) -> *mut Node {
        let mut cur: *mut Node = start;
        loop {
            // SAFETY: callers pass a node owned by this chain while holding
            // `&mut self`.
            let next: *mut Node = unsafe { (*cur).next.load(RELAXED) };
            if next.is_null() {
                return cur;
            }
            cur = next;
        }
    }
}

impl Default for Bucket {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Bucket {
    fn drop(&mut self) {
        while self.drain_head().is_some() {}
    }
}

impl StdFmt::Debug for Bucket {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("Bucket")
            .field("count", &self.len())
            .field("sum", &self.sum())
            .field("is_empty", &self.is_empty())
            .finish_non_exhaustive()
    }
}

impl StdFmt::Display for Bucket {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        for (i, node) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
