//! SyncEvent - Everything a sync run reports, and the sink that receives it

use super::{SyncError, SyncReport};
use std::fmt;
use std::path::PathBuf;

/// Stage of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    ReconcilingDirectories,
    UpdatingFiles,
    CopyingMissing,
    RemovingExtra,
}

impl SyncPhase {
    /// Phase that follows this one within a run
    pub fn next(self) -> SyncPhase {
        match self {
            SyncPhase::Idle => SyncPhase::ReconcilingDirectories,
            SyncPhase::ReconcilingDirectories => SyncPhase::UpdatingFiles,
            SyncPhase::UpdatingFiles => SyncPhase::CopyingMissing,
            SyncPhase::CopyingMissing => SyncPhase::RemovingExtra,
            SyncPhase::RemovingExtra => SyncPhase::Idle,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SyncPhase::Idle => "idle",
            SyncPhase::ReconcilingDirectories => "reconciling directories",
            SyncPhase::UpdatingFiles => "updating files",
            SyncPhase::CopyingMissing => "copying missing files",
            SyncPhase::RemovingExtra => "removing extra files",
        }
    }
}

/// Item-level filesystem operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Scan,
    Compare,
    Update,
    Copy,
    DeleteFile,
    CreateDir,
    DeleteDir,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::Scan => "scan",
            Operation::Compare => "compare",
            Operation::Update => "update",
            Operation::Copy => "copy",
            Operation::DeleteFile => "delete file",
            Operation::CreateDir => "create directory",
            Operation::DeleteDir => "delete directory",
        }
    }
}

/// Severity of an event, mapped onto log levels by the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Events emitted while synchronizing
#[derive(Debug)]
pub enum SyncEvent {
    /// A run moved into a new phase
    PhaseStarted(SyncPhase),

    /// Replica root did not exist and was created
    ReplicaRootCreated(PathBuf),

    DirectoryCreated(PathBuf),
    DirectoryDeleted(PathBuf),

    /// Common file overwritten because contents differed
    FileUpdated { path: PathBuf, bytes: u64 },
    FileCopied { path: PathBuf, bytes: u64 },
    FileDeleted(PathBuf),

    /// Common file already identical, nothing written
    FileUnchanged(PathBuf),

    /// Walker could not read an entry; the rest of the tree is still scanned
    ScanWarning { root: PathBuf, error: SyncError },

    /// One operation failed; the phase moves on to the next item
    ItemFailed {
        operation: Operation,
        path: PathBuf,
        error: SyncError,
    },

    /// Run finished (with or without item failures)
    RunComplete(SyncReport),
}

impl SyncEvent {
    pub fn level(&self) -> EventLevel {
        match self {
            SyncEvent::PhaseStarted(_) | SyncEvent::FileUnchanged(_) => EventLevel::Debug,
            SyncEvent::ScanWarning { .. } => EventLevel::Warn,
            SyncEvent::ItemFailed { .. } => EventLevel::Error,
            _ => EventLevel::Info,
        }
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::PhaseStarted(phase) => write!(f, "Phase: {}", phase.label()),
            SyncEvent::ReplicaRootCreated(root) => {
                write!(f, "Replica folder {} created.", root.display())
            }
            SyncEvent::DirectoryCreated(path) => {
                write!(f, "Directory {} created in replica folder.", path.display())
            }
            SyncEvent::DirectoryDeleted(path) => {
                write!(f, "Directory {} deleted from replica folder.", path.display())
            }
            SyncEvent::FileUpdated { path, bytes } => {
                write!(f, "File {} updated ({} bytes).", path.display(), bytes)
            }
            SyncEvent::FileCopied { path, bytes } => {
                write!(f, "File {} copied to replica ({} bytes).", path.display(), bytes)
            }
            SyncEvent::FileDeleted(path) => {
                write!(f, "File {} deleted from replica folder.", path.display())
            }
            SyncEvent::FileUnchanged(path) => write!(f, "File {} unchanged.", path.display()),
            SyncEvent::ScanWarning { root, error } => {
                write!(f, "Scan of {} skipped an entry: {}", root.display(), error)
            }
            SyncEvent::ItemFailed {
                operation,
                path,
                error,
            } => write!(
                f,
                "Failed to {} {}: {}",
                operation.label(),
                path.display(),
                error
            ),
            SyncEvent::RunComplete(report) => write!(
                f,
                "Sync run completed (Duration: {:.3} seconds, {}).",
                report.duration.as_secs_f64(),
                report.summary()
            ),
        }
    }
}

/// Receives every event of a sync run
///
/// Passed by reference into each component. Closures taking `&SyncEvent`
/// implement it, which is what the tests use to record events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &SyncEvent);
}

impl<F> EventSink for F
where
    F: Fn(&SyncEvent) + Send + Sync,
{
    fn emit(&self, event: &SyncEvent) {
        self(event)
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &SyncEvent) {}
}
