//! SyncReport - Outcome of one sync run

use chrono::{DateTime, Local};
use std::time::Duration;

/// Per-run statistics
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Wall-clock time the run started
    pub started_at: DateTime<Local>,
    pub duration: Duration,

    pub dirs_created: usize,
    pub dirs_deleted: usize,
    pub files_updated: usize,
    pub files_copied: usize,
    pub files_deleted: usize,
    pub files_unchanged: usize,

    /// Bytes written by updates and copies
    pub bytes_copied: u64,

    /// Item-level operations that failed (scan entries included)
    pub failures: usize,
}

impl SyncReport {
    pub fn new(started_at: DateTime<Local>) -> Self {
        Self {
            started_at,
            duration: Duration::from_secs(0),
            dirs_created: 0,
            dirs_deleted: 0,
            files_updated: 0,
            files_copied: 0,
            files_deleted: 0,
            files_unchanged: 0,
            bytes_copied: 0,
            failures: 0,
        }
    }

    /// True when every item-level operation of the run succeeded
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }

    /// Number of filesystem mutations applied to the replica
    pub fn mutations(&self) -> usize {
        self.dirs_created
            + self.dirs_deleted
            + self.files_updated
            + self.files_copied
            + self.files_deleted
    }

    pub fn summary(&self) -> String {
        format!(
            "dirs +{} -{}, files updated {} copied {} deleted {} unchanged {}, {} failure(s)",
            self.dirs_created,
            self.dirs_deleted,
            self.files_updated,
            self.files_copied,
            self.files_deleted,
            self.files_unchanged,
            self.failures
        )
    }
}
