//! Progress-callback trait for batch events.
//!
//! Pass an [`Arc<dyn BatchProgressCallback>`] to
//! [`crate::batch::BatchDriver::with_progress`] to observe a run. Progress is
//! purely informational: a callback cannot change what the driver does.
//!
//! # Example
//!
//! ```rust
//! use pdfsumm::BatchProgressCallback;
//! use std::path::Path;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct Counter(AtomicUsize);
//!
//! impl BatchProgressCallback for Counter {
//!     fn on_file_complete(&self, _index: usize, _total: usize, _source: &Path) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// One of the three phases of a staged (async) run.
///
/// The synchronous driver reports a single `Write` stage covering the
/// whole per-file loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    Summarize,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Extract => "extract",
            Stage::Summarize => "summarize",
            Stage::Write => "write",
        })
    }
}

/// Called by the batch drivers as they work through the file list.
///
/// All methods default to no-ops. Implementations must be `Send + Sync`;
/// in async mode `on_file_complete` fires from inside concurrently polled
/// futures, so shared counters need atomics or a mutex.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before any file is touched.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called when a stage begins.
    fn on_stage_start(&self, stage: Stage, total_files: usize) {
        let _ = (stage, total_files);
    }

    /// Called when the file at `index` (0-based, input order) finished the
    /// current stage. In sync mode this means its summary is on disk.
    fn on_file_complete(&self, index: usize, total_files: usize, source: &Path) {
        let _ = (index, total_files, source);
    }

    /// Called once after every summary has been written.
    fn on_batch_complete(&self, written: usize) {
        let _ = written;
    }
}

/// A no-op implementation, the default when no callback is configured.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::batch::BatchDriver`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        stages: Mutex<Vec<Stage>>,
        completes: AtomicUsize,
        written: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_stage_start(&self, stage: Stage, _total: usize) {
            self.stages.lock().unwrap().push(stage);
        }

        fn on_file_complete(&self, _index: usize, _total: usize, _source: &Path) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, written: usize) {
            self.written.store(written, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_stage_start(Stage::Extract, 2);
        cb.on_file_complete(0, 2, Path::new("a.pdf"));
        cb.on_batch_complete(2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_stage_start(Stage::Extract, 2);
        tracker.on_file_complete(0, 2, Path::new("a.pdf"));
        tracker.on_file_complete(1, 2, Path::new("b.pdf"));
        tracker.on_stage_start(Stage::Summarize, 2);
        tracker.on_batch_complete(2);

        assert_eq!(
            *tracker.stages.lock().unwrap(),
            vec![Stage::Extract, Stage::Summarize]
        );
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.written.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stage_display() {
        assert_eq!(Stage::Summarize.to_string(), "summarize");
    }
}
