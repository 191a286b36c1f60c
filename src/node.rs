//! Filepath: src/node.rs
//!
//! A single key/value entry in a bucket chain.

use std::fmt as StdFmt;
use std::ptr;
use std::sync::atomic::AtomicPtr;

use crate::ordering::{READ_ORD, RELAXED};

/// An immutable key/value pair plus the link to the next node in its bucket.
///
/// `key` and `value` never change after construction. The `next` link is
/// written once when the node's successor is appended and cleared when the
/// node is drained out of its bucket. The successor is owned by this node:
/// dropping a bucket walks the chain and frees each node exactly once.
///
/// # Example
///
/// ```rust
/// use residue_table::Node;
///
/// let node = Node::new(4, 40);
/// assert_eq!(node.key(), 4);
/// assert_eq!(node.value(), 40);
/// assert_eq!(node.to_string(), "Node: 4 Value: 40");
/// ```
pub struct Node {
    key: i64,
    value: i64,

    /// Successor in the chain, null at the tail.
    ///
    /// Atomic so that an unsynchronized append racing a scan stays a lost
    /// update instead of a data race.
    pub(crate) next: AtomicPtr<Node>,
}

impl Node {
    /// Create a detached node.
    #[must_use]
    pub const fn new(key: i64, value: i64) -> Self {
        Self {
            key,
            value,
            next: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// The node's key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> i64 {
        self.key
    }

    /// The node's value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// The successor in the chain, if any.
    #[inline]
    #[must_use]
    pub fn next(&self) -> Option<&Self> {
        let next: *mut Self = self.next.load(READ_ORD);

        // SAFETY: a non-null `next` points at a node owned by the same chain.
        // Nodes are only freed through `&mut Bucket`, which cannot coexist
        // with the `&self` borrow this reference is tied to.
        unsafe { next.as_ref() }
    }

    /// Whether the node is detached (has no successor).
    #[inline]
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next.load(RELAXED).is_null()
    }
}

impl StdFmt::Debug for Node {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("has_next", &!self.is_last())
            .finish()
    }
}

impl StdFmt::Display for Node {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        write!(f, "Node: {} Value: {}", self.key, self.value)
    }
}
