use super::record_failure;
use crate::diff::FilePlan;
use crate::executor::{remove_file, FileReplicator};
use crate::hash::ContentComparator;
use crate::scanner::PathScanner;
use crate::types::{EventSink, NullSink, Operation, SyncEvent, SyncReport};
use std::path::Path;

/// Makes the replica's files equal to the source's, in three phases
///
/// 1. `update_common` - overwrite common files whose content differs
/// 2. `copy_missing` - copy source-only files
/// 3. `remove_extra` - delete replica-only files
pub struct FileReconciler<'a> {
    sink: &'a dyn EventSink,
    comparator: ContentComparator,
    replicator: FileReplicator,
}

impl<'a> FileReconciler<'a> {
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self {
            sink,
            comparator: ContentComparator::new(),
            replicator: FileReplicator::new(),
        }
    }

    /// Scan both roots once and partition their files
    ///
    /// The plan stays valid for all three phases of a run: the phases only
    /// touch paths inside their own partition.
    pub fn plan(&self, source_root: &Path, replica_root: &Path, report: &mut SyncReport) -> FilePlan {
        let scanner = PathScanner::new(self.sink);
        let source = scanner.scan(source_root);
        let replica = scanner.scan(replica_root);
        report.failures += source.warnings + replica.warnings;

        FilePlan::from_snapshots(&source, &replica)
    }

    /// Partition files again after the directory phase
    ///
    /// The directory phase already reported this run's scan warnings, so
    /// this walk stays silent and leaves `failures` alone. Unreadable
    /// entries still hold back replica extras.
    pub fn rescan(&self, source_root: &Path, replica_root: &Path) -> FilePlan {
        let scanner = PathScanner::new(&NullSink);
        let source = scanner.scan(source_root);
        let replica = scanner.scan(replica_root);

        FilePlan::from_snapshots(&source, &replica)
    }

    /// Run all three phases in order
    pub fn reconcile(&self, source_root: &Path, replica_root: &Path, report: &mut SyncReport) {
        let plan = self.plan(source_root, replica_root, report);
        self.update_common(&plan, source_root, replica_root, report);
        self.copy_missing(&plan, source_root, replica_root, report);
        self.remove_extra(&plan, replica_root, report);
    }

    /// Overwrite every common file whose content differs
    ///
    /// A failed comparison is reported and the file is replicated anyway:
    /// an unreadable file is never assumed to be up to date.
    pub fn update_common(
        &self,
        plan: &FilePlan,
        source_root: &Path,
        replica_root: &Path,
        report: &mut SyncReport,
    ) {
        for relative in &plan.common {
            let src_path = source_root.join(relative);
            let dest_path = replica_root.join(relative);

            match self.comparator.are_equal(&src_path, &dest_path) {
                Ok(true) => {
                    report.files_unchanged += 1;
                    self.sink.emit(&SyncEvent::FileUnchanged(relative.clone()));
                    continue;
                }
                Ok(false) => {}
                Err(error) => {
                    record_failure(self.sink, report, Operation::Compare, relative, error)
                }
            }

            match self.replicator.copy(&src_path, &dest_path) {
                Ok(bytes) => {
                    report.files_updated += 1;
                    report.bytes_copied += bytes;
                    self.sink.emit(&SyncEvent::FileUpdated {
                        path: relative.clone(),
                        bytes,
                    });
                }
                Err(error) => record_failure(self.sink, report, Operation::Update, relative, error),
            }
        }
    }

    /// Copy every source-only file into the replica
    pub fn copy_missing(
        &self,
        plan: &FilePlan,
        source_root: &Path,
        replica_root: &Path,
        report: &mut SyncReport,
    ) {
        for relative in &plan.missing {
            match self
                .replicator
                .copy(&source_root.join(relative), &replica_root.join(relative))
            {
                Ok(bytes) => {
                    report.files_copied += 1;
                    report.bytes_copied += bytes;
                    self.sink.emit(&SyncEvent::FileCopied {
                        path: relative.clone(),
                        bytes,
                    });
                }
                Err(error) => record_failure(self.sink, report, Operation::Copy, relative, error),
            }
        }
    }

    /// Delete every replica-only file
    pub fn remove_extra(&self, plan: &FilePlan, replica_root: &Path, report: &mut SyncReport) {
        for relative in &plan.extra {
            match remove_file(&replica_root.join(relative)) {
                Ok(()) => {
                    report.files_deleted += 1;
                    self.sink.emit(&SyncEvent::FileDeleted(relative.clone()));
                }
                Err(error) => {
                    record_failure(self.sink, report, Operation::DeleteFile, relative, error)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[test]
    fn test_plan_partitions_files() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("common.txt"), b"a").expect("write");
        fs::write(dst.path().join("common.txt"), b"a").expect("write");
        fs::write(src.path().join("new.txt"), b"n").expect("write");
        fs::write(dst.path().join("stale.txt"), b"s").expect("write");

        let mut report = SyncReport::new(Local::now());
        let plan = FileReconciler::new(&NullSink).plan(src.path(), dst.path(), &mut report);

        assert!(plan.common.contains(Path::new("common.txt")));
        assert!(plan.missing.contains(Path::new("new.txt")));
        assert!(plan.extra.contains(Path::new("stale.txt")));
    }

    #[test]
    fn test_rescan_is_silent_about_missing_roots() {
        let root = TempDir::new().expect("create tempdir");
        let src = root.path().join("src");
        fs::create_dir(&src).expect("create source");
        fs::write(src.join("a.txt"), b"a").expect("write");

        let events: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
        let events_ref = Arc::clone(&events);
        let sink = move |_event: &SyncEvent| {
            *events_ref.lock().expect("lock") += 1;
        };

        let plan = FileReconciler::new(&sink).rescan(&src, &root.path().join("missing"));

        assert!(plan.missing.contains(Path::new("a.txt")));
        assert_eq!(*events.lock().expect("lock"), 0);
    }

    #[test]
    fn test_update_overwrites_only_changed_files() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("changed.txt"), b"hello").expect("write");
        fs::write(dst.path().join("changed.txt"), b"world").expect("write");
        fs::write(src.path().join("same.txt"), b"same").expect("write");
        fs::write(dst.path().join("same.txt"), b"same").expect("write");

        let mut report = SyncReport::new(Local::now());
        let reconciler = FileReconciler::new(&NullSink);
        let plan = reconciler.plan(src.path(), dst.path(), &mut report);
        reconciler.update_common(&plan, src.path(), dst.path(), &mut report);

        assert_eq!(fs::read(dst.path().join("changed.txt")).unwrap(), b"hello");
        assert_eq!(report.files_updated, 1);
        assert_eq!(report.files_unchanged, 1);
        assert_eq!(report.bytes_copied, 5);
    }

    #[test]
    fn test_phases_run_in_order() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("b.txt"), b"new").expect("write");
        fs::write(dst.path().join("b.txt"), b"old").expect("write");
        fs::write(src.path().join("c.txt"), b"copy me").expect("write");
        fs::write(dst.path().join("a.txt"), b"delete me").expect("write");

        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let events_ref = Arc::clone(&events);
        let sink = move |event: &SyncEvent| {
            let label = match event {
                SyncEvent::FileUpdated { .. } => "update",
                SyncEvent::FileCopied { .. } => "copy",
                SyncEvent::FileDeleted(_) => "delete",
                _ => return,
            };
            events_ref.lock().expect("lock events").push(label.to_string());
        };

        let mut report = SyncReport::new(Local::now());
        FileReconciler::new(&sink).reconcile(src.path(), dst.path(), &mut report);

        assert_eq!(
            events.lock().expect("lock").clone(),
            vec!["update", "copy", "delete"]
        );
        assert!(report.is_clean());
    }

    #[test]
    fn test_failed_item_does_not_stop_phase() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("good.txt"), b"good").expect("write");

        // "missing.txt" is planned but gone by the time the phase runs.
        let plan = FilePlan {
            missing: [PathBuf::from("missing.txt"), PathBuf::from("good.txt")]
                .into_iter()
                .collect(),
            ..FilePlan::default()
        };

        let failures: Arc<Mutex<Vec<Operation>>> = Arc::new(Mutex::new(Vec::new()));
        let failures_ref = Arc::clone(&failures);
        let sink = move |event: &SyncEvent| {
            if let SyncEvent::ItemFailed { operation, .. } = event {
                failures_ref.lock().expect("lock").push(*operation);
            }
        };

        let mut report = SyncReport::new(Local::now());
        FileReconciler::new(&sink).copy_missing(&plan, src.path(), dst.path(), &mut report);

        assert_eq!(report.failures, 1);
        assert_eq!(report.files_copied, 1);
        assert_eq!(failures.lock().expect("lock").clone(), vec![Operation::Copy]);
        assert!(dst.path().join("good.txt").exists());
    }

    #[test]
    fn test_compare_failure_falls_back_to_copy() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("file.txt"), b"source").expect("write");
        // Replica holds a directory where the common file should be, so the
        // comparison cannot read it.
        fs::create_dir(dst.path().join("file.txt")).expect("create dir");

        let plan = FilePlan {
            common: [PathBuf::from("file.txt")].into_iter().collect(),
            ..FilePlan::default()
        };

        let failures: Arc<Mutex<Vec<Operation>>> = Arc::new(Mutex::new(Vec::new()));
        let failures_ref = Arc::clone(&failures);
        let sink = move |event: &SyncEvent| {
            if let SyncEvent::ItemFailed { operation, .. } = event {
                failures_ref.lock().expect("lock").push(*operation);
            }
        };

        let mut report = SyncReport::new(Local::now());
        FileReconciler::new(&sink).update_common(&plan, src.path(), dst.path(), &mut report);

        // The compare failed, a copy was still attempted (and failed on the
        // directory in the way).
        assert_eq!(
            failures.lock().expect("lock").clone(),
            vec![Operation::Compare, Operation::Update]
        );
        assert_eq!(report.files_unchanged, 0);
    }

    #[test]
    fn test_remove_extra_deletes_replica_only_files() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::create_dir(dst.path().join("sub")).expect("create dir");
        fs::write(dst.path().join("sub/stale.txt"), b"x").expect("write");

        let mut report = SyncReport::new(Local::now());
        let reconciler = FileReconciler::new(&NullSink);
        let plan = reconciler.plan(src.path(), dst.path(), &mut report);
        reconciler.remove_extra(&plan, dst.path(), &mut report);

        assert!(!dst.path().join("sub/stale.txt").exists());
        assert!(dst.path().join("sub").is_dir(), "directories are not touched");
        assert_eq!(report.files_deleted, 1);
    }
}
