//! Reconciliation - apply set differences to the replica
//!
//! Each reconciler scans, plans and mutates. Every item is attempted on its
//! own: a failure is reported through the sink, counted in the run's
//! `SyncReport`, and the loop moves on to the next path.

mod directories;
mod files;

pub use directories::DirectoryReconciler;
pub use files::FileReconciler;

use crate::types::{EventSink, Operation, SyncError, SyncEvent, SyncReport};
use std::path::Path;

fn record_failure(
    sink: &dyn EventSink,
    report: &mut SyncReport,
    operation: Operation,
    path: &Path,
    error: SyncError,
) {
    report.failures += 1;
    sink.emit(&SyncEvent::ItemFailed {
        operation,
        path: path.to_path_buf(),
        error,
    });
}
