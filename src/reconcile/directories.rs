use super::record_failure;
use crate::diff::DirectoryPlan;
use crate::executor::{create_dir, remove_dir, CreateDirOutcome};
use crate::scanner::PathScanner;
use crate::types::{EventSink, Operation, SyncEvent, SyncReport};
use std::path::Path;

/// Makes the replica's directory set equal to the source's
pub struct DirectoryReconciler<'a> {
    sink: &'a dyn EventSink,
}

impl<'a> DirectoryReconciler<'a> {
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self { sink }
    }

    /// Scan both roots, then create missing and delete extra directories
    ///
    /// All creations happen before any deletion. Deletion is recursive.
    pub fn reconcile(&self, source_root: &Path, replica_root: &Path, report: &mut SyncReport) {
        let scanner = PathScanner::new(self.sink);
        let source = scanner.scan(source_root);
        let replica = scanner.scan(replica_root);
        report.failures += source.warnings + replica.warnings;

        let plan = DirectoryPlan::from_snapshots(&source, &replica);
        self.apply(&plan, replica_root, report);
    }

    /// Apply a precomputed plan under `replica_root`
    pub fn apply(&self, plan: &DirectoryPlan, replica_root: &Path, report: &mut SyncReport) {
        for relative in &plan.missing {
            match create_dir(&replica_root.join(relative)) {
                Ok(CreateDirOutcome::AlreadyPresent) => {}
                Ok(outcome) => {
                    if outcome == CreateDirOutcome::ReplacedFile {
                        report.files_deleted += 1;
                        self.sink.emit(&SyncEvent::FileDeleted(relative.clone()));
                    }
                    report.dirs_created += 1;
                    self.sink.emit(&SyncEvent::DirectoryCreated(relative.clone()));
                }
                Err(error) => {
                    record_failure(self.sink, report, Operation::CreateDir, relative, error)
                }
            }
        }

        for relative in plan.removal_roots() {
            match remove_dir(&replica_root.join(relative)) {
                Ok(()) => {
                    report.dirs_deleted += 1;
                    self.sink.emit(&SyncEvent::DirectoryDeleted(relative.clone()));
                }
                Err(error) => {
                    record_failure(self.sink, report, Operation::DeleteDir, relative, error)
                }
            }
        }
    }
}
