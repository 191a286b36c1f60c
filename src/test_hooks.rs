//! Test hooks for deterministic race reproduction.
//!
//! These hooks let tests pause a writer inside the unsynchronized
//! read-modify-write windows and line several writers up on the same stale
//! value, so a lost append or a lost counter update happens every time
//! instead of once in a few thousand runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::{Arc, Barrier};
//!
//! let barrier = Arc::new(Barrier::new(2));
//!
//! // In each writer thread, before inserting:
//! let b = Arc::clone(&barrier);
//! set_before_link_hook(Box::new(move || {
//!     b.wait(); // both writers have read the same tail
//! }));
//! ```
//!
//! Hooks are thread-local: a hook only fires on the thread that installed it,
//! so tests running in parallel do not trip over each other's barriers.
//! Only available in test builds (`#[cfg(test)]`).

use std::cell::RefCell;

/// Hook type: a boxed closure that takes no arguments.
pub type TestHook = Box<dyn Fn()>;

thread_local! {
    /// Called in `Bucket::append` after the tail was read and before the new
    /// node is linked behind it.
    static BEFORE_LINK_HOOK: RefCell<Option<TestHook>> = const { RefCell::new(None) };

    /// Called in `Counter::racy_add` after the load and before the store.
    static BEFORE_COUNTER_STORE_HOOK: RefCell<Option<TestHook>> = const { RefCell::new(None) };
}

/// Set the hook called before an append links its node.
///
/// # Panics
/// Panics if the hook was already set on this thread and not cleared.
pub fn set_before_link_hook(hook: TestHook) {
    BEFORE_LINK_HOOK.with(|cell| {
        let mut slot = cell.borrow_mut();
        assert!(
            slot.is_none(),
            "BEFORE_LINK_HOOK already set; call clear_before_link_hook first"
        );
        *slot = Some(hook);
    });
}

/// Clear the before-link hook on this thread.
pub fn clear_before_link_hook() {
    BEFORE_LINK_HOOK.with(|cell| *cell.borrow_mut() = None);
}

/// Call the before-link hook if set.
pub(crate) fn call_before_link_hook() {
    BEFORE_LINK_HOOK.with(|cell| {
        if let Some(ref hook) = *cell.borrow() {
            hook();
        }
    });
}

/// Set the hook called between the load and the store of a racy counter add.
///
/// # Panics
/// Panics if the hook was already set on this thread and not cleared.
pub fn set_before_counter_store_hook(hook: TestHook) {
    BEFORE_COUNTER_STORE_HOOK.with(|cell| {
        let mut slot = cell.borrow_mut();
        assert!(
            slot.is_none(),
            "BEFORE_COUNTER_STORE_HOOK already set; call clear_before_counter_store_hook first"
        );
        *slot = Some(hook);
    });
}

/// Clear the before-counter-store hook on this thread.
pub fn clear_before_counter_store_hook() {
    BEFORE_COUNTER_STORE_HOOK.with(|cell| *cell.borrow_mut() = None);
}

/// Call the before-counter-store hook if set.
pub(crate) fn call_before_counter_store_hook() {
    BEFORE_COUNTER_STORE_HOOK.with(|cell| {
        if let Some(ref hook) = *cell.borrow() {
            hook();
        }
    });
}

/// Clear all test hooks on this thread.
///
/// Should be called at the end of a worker to avoid leaking hooks into
/// later work on the same thread.
pub fn clear_all_hooks() {
    clear_before_link_hook();
    clear_before_counter_store_hook();
}
