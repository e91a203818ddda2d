//! Executor module for replica mutations

pub mod copy;

use crate::types::SyncError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub use copy::{FileReplicator, PART_SUFFIX};

/// Outcome of creating a directory in the replica
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateDirOutcome {
    Created,
    /// A non-directory entry occupied the path and was removed first
    ReplacedFile,
    AlreadyPresent,
}

/// Create `path` and any missing ancestors
///
/// A file or symlink sitting where the directory belongs is removed first.
pub fn create_dir(path: &Path) -> Result<CreateDirOutcome, SyncError> {
    let mut outcome = CreateDirOutcome::Created;

    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => return Ok(CreateDirOutcome::AlreadyPresent),
        Ok(_) => {
            fs::remove_file(path).map_err(|e| SyncError::from_io(path, e))?;
            outcome = CreateDirOutcome::ReplacedFile;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(SyncError::from_io(path, e)),
    }

    fs::create_dir_all(path).map_err(|e| SyncError::from_io(path, e))?;
    Ok(outcome)
}

/// Remove a directory and everything beneath it
///
/// Already-missing directories count as removed.
pub fn remove_dir(path: &Path) -> Result<(), SyncError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(SyncError::from_io(path, e)),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SyncError::from_io(path, e)),
    }
}

/// Remove a single file, treating `NotFound` as success
pub fn remove_file(path: &Path) -> Result<(), SyncError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SyncError::from_io(path, e)),
    }
}
