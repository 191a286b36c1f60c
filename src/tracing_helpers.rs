//! Internal log macros, forwarded to `tracing` only with the `tracing` feature.
//!
//! Without the feature every macro expands to nothing, so the hot paths
//! (`Bucket::append`, `Counter::racy_add` windows) carry no logging cost and
//! the race timing the tests depend on is undisturbed.
//!
//! Levels used by this crate:
//! - `trace`: each insert and append
//! - `debug`: batch lock acquired/released, partial sums and merges
//! - `warn`: a drain repaired a stale tail left by a lost append
//! - `error`: a key routed outside the three buckets, right before the panic

#![allow(unused_macros, unused_imports)]

/// `tracing::trace!` or nothing.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! error_log {
    ($($arg:tt)*) => {
        tracing::error!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! error_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use error_log;
pub(crate) use trace_log;
pub(crate) use warn_log;
