//! SyncEngine - one full synchronization pass

use crate::reconcile::{DirectoryReconciler, FileReconciler};
use crate::types::{EventSink, Operation, SyncError, SyncEvent, SyncPhase, SyncReport};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Mirrors `source` onto `replica`
///
/// Holds only the two roots and the event sink; every run recomputes the
/// state of both trees from the filesystem.
pub struct SyncEngine {
    source: PathBuf,
    replica: PathBuf,
    sink: Arc<dyn EventSink>,
}

impl SyncEngine {
    /// Create an engine for one source/replica pair
    ///
    /// # Errors
    /// `SyncError::Config` if `source` does not exist or is not a directory.
    /// This is the only fatal error: nothing a run encounters aborts it.
    pub fn new(
        source: impl Into<PathBuf>,
        replica: impl Into<PathBuf>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, SyncError> {
        let source = source.into();
        let replica = replica.into();

        match fs::metadata(&source) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                return Err(SyncError::Config(format!(
                    "Source path is not a directory: {}",
                    source.display()
                )))
            }
            Err(e) => {
                return Err(SyncError::Config(format!(
                    "Source path does not exist: {} ({})",
                    source.display(),
                    e
                )))
            }
        }

        Ok(Self {
            source,
            replica,
            sink,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn replica(&self) -> &Path {
        &self.replica
    }

    /// Run one synchronization pass
    ///
    /// Phases run strictly in order: directories, then updates of common
    /// files, then copies of missing files, then removal of extra files.
    /// Item failures are reported and counted; the run always completes.
    pub fn run(&self) -> SyncReport {
        let start_time = Instant::now();
        let mut report = SyncReport::new(Local::now());
        let sink: &dyn EventSink = self.sink.as_ref();

        if self.ensure_replica_root(&mut report) {
            self.run_phases(&mut report);
        }
        sink.emit(&SyncEvent::PhaseStarted(SyncPhase::Idle));

        report.duration = start_time.elapsed();
        sink.emit(&SyncEvent::RunComplete(report.clone()));
        report
    }

    fn run_phases(&self, report: &mut SyncReport) {
        let sink: &dyn EventSink = self.sink.as_ref();

        let mut phase = SyncPhase::Idle.next();
        sink.emit(&SyncEvent::PhaseStarted(phase));
        DirectoryReconciler::new(sink).reconcile(&self.source, &self.replica, report);

        let files = FileReconciler::new(sink);
        let plan = files.rescan(&self.source, &self.replica);

        phase = phase.next();
        sink.emit(&SyncEvent::PhaseStarted(phase));
        files.update_common(&plan, &self.source, &self.replica, report);

        phase = phase.next();
        sink.emit(&SyncEvent::PhaseStarted(phase));
        files.copy_missing(&plan, &self.source, &self.replica, report);

        phase = phase.next();
        sink.emit(&SyncEvent::PhaseStarted(phase));
        files.remove_extra(&plan, &self.replica, report);
    }

    /// False when the replica root is unusable; the phases are then skipped
    /// and the single failure is retried next run.
    fn ensure_replica_root(&self, report: &mut SyncReport) -> bool {
        if self.replica.is_dir() {
            return true;
        }
        match fs::create_dir_all(&self.replica) {
            Ok(()) => {
                self.sink
                    .emit(&SyncEvent::ReplicaRootCreated(self.replica.clone()));
                true
            }
            Err(e) => {
                report.failures += 1;
                self.sink.emit(&SyncEvent::ItemFailed {
                    operation: Operation::CreateDir,
                    path: self.replica.clone(),
                    error: SyncError::from_io(&self.replica, e),
                });
                false
            }
        }
    }
}
