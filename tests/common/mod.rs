//! Shared setup for the integration tests and the granularity benches.
//!
//! Two concerns live here:
//! - A process-wide `tracing` subscriber, so the library's events (batch lock
//!   taken and released, partial sums merged, stale tail repaired) are visible
//!   when the crate is built with `--features tracing`.
//! - Workload splitting: how a key range is handed to a set of writers.
//!
//! Environment:
//! - `RUST_LOG` filters both outputs (default `warn`).
//! - `RESIDUE_TABLE_LOG_DIR` moves the JSON log (default `logs/`).
//! - `RESIDUE_TABLE_LOG_CONSOLE=0` silences the console output.
//!
//! ```bash
//! RUST_LOG=residue_table::table=debug cargo test --features tracing --test stress_tests
//! jq 'select(.fields.subtotal != null)' logs/residue_table.jsonl
//! ```

#![allow(dead_code)]

use std::env;
use std::fs::{self, File, OpenOptions};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::{Mutex, Once};

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const LOG_FILE: &str = "residue_table.jsonl";

static INIT: Once = Once::new();

/// Where the test logs go, read once from the environment.
struct LogTargets {
    json_path: PathBuf,
    console: bool,
}

impl LogTargets {
    fn from_env() -> Self {
        let dir = env::var_os("RESIDUE_TABLE_LOG_DIR")
            .map_or_else(|| PathBuf::from("logs"), PathBuf::from);
        Self {
            json_path: dir.join(LOG_FILE),
            console: env::var("RESIDUE_TABLE_LOG_CONSOLE").map_or(true, |v| v != "0"),
        }
    }

    /// Open the JSON log for appending; every test binary writes to it.
    fn open_json(&self) -> Option<File> {
        if let Some(dir) = self.json_path.parent() {
            fs::create_dir_all(dir).ok()?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.json_path)
            .ok()
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the subscriber. Only the first call in a process does anything.
///
/// A log file that cannot be opened drops the JSON output instead of failing
/// the test.
pub fn init_tracing() {
    INIT.call_once(|| {
        let targets = LogTargets::from_env();

        let json_layer = targets.open_json().map(|file| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter())
        });

        let console_layer = targets.console.then(|| {
            tracing_subscriber::fmt::layer()
                .compact()
                .with_thread_names(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(filter())
        });

        let _ = Registry::default()
            .with(json_layer)
            .with(console_layer)
            .try_init();
    });
}

// =============================================================================
// Workload splitting
// =============================================================================

/// Split `1..=n` into `workers` contiguous ranges; the last takes the remainder.
///
/// Zero workers is treated as one.
pub fn contiguous_ranges(n: i64, workers: usize) -> Vec<RangeInclusive<i64>> {
    let workers = i64::try_from(workers.max(1)).unwrap_or(i64::MAX);
    let span = n / workers;
    (0..workers)
        .map(|w| {
            let start = w * span + 1;
            let end = if w == workers - 1 { n } else { (w + 1) * span };
            start..=end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::debug!(key = 5, bucket = 2, "subscriber installed");
    }

    #[test]
    fn test_contiguous_ranges_cover_everything() {
        assert_eq!(contiguous_ranges(10, 3), vec![1..=3, 4..=6, 7..=10]);
    }

    #[test]
    fn test_zero_workers_gets_one_range() {
        assert_eq!(contiguous_ranges(10, 0), vec![1..=10]);
    }
}
