//! Error types for foldsync

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for foldsync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration (fatal, aborts startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path does not exist
    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    /// Source and destination resolve to the same filesystem entry
    #[error("Source and destination are the same file: {path}")]
    SameFile { path: PathBuf },

    /// A file operation was given a directory
    #[error("Expected a file but found a directory: {path}")]
    IsADirectory { path: PathBuf },

    /// Path argument cannot be used for the operation
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal failure for one entry
    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// A scheduled run did not finish (panicked or was cancelled)
    #[error("Sync run aborted: {0}")]
    RunAborted(String),
}

impl SyncError {
    /// Classify an `io::Error` raised while operating on `path`.
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::PermissionDenied => SyncError::PermissionDenied {
                path: path.to_path_buf(),
            },
            ErrorKind::NotFound => SyncError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SyncError::Io(error),
        }
    }

    /// Errors that abort the process rather than a single item
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Config(_) | SyncError::RunAborted(_))
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        match self {
            SyncError::PermissionDenied { .. } => true,
            SyncError::Io(e) => e.kind() == ErrorKind::PermissionDenied,
            _ => false,
        }
    }

    /// Check if this error means the path was missing
    pub fn is_not_found(&self) -> bool {
        match self {
            SyncError::NotFound { .. } => true,
            SyncError::Io(e) => e.kind() == ErrorKind::NotFound,
            _ => false,
        }
    }
}
