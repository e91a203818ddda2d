//! Sequential directory walker

use crate::types::{EventSink, PathSet, SyncError, SyncEvent, TreeSnapshot};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

/// Walks a sync root and records its files and subdirectories
///
/// Nothing is filtered: hidden files and paths matched by `.gitignore` are
/// part of the mirror. Links are not followed, and symlinks and special
/// files are left out of both sets.
pub struct PathScanner<'a> {
    sink: &'a dyn EventSink,
}

impl<'a> PathScanner<'a> {
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self { sink }
    }

    /// Scan `root` and build a TreeSnapshot
    ///
    /// # Errors
    /// None are returned. A walker error for one entry is reported as
    /// `SyncEvent::ScanWarning`, the entry (and its subtree, for a directory)
    /// is recorded in `unreadable`, and the walk continues with its siblings.
    /// A missing root yields an empty snapshot with a single warning.
    pub fn scan(&self, root: &Path) -> TreeSnapshot {
        let start_time = Instant::now();
        let mut snapshot = TreeSnapshot::new(root.to_path_buf());

        match std::fs::metadata(root) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                self.warn(&mut snapshot, SyncError::InvalidPath(format!(
                    "{} is not a directory",
                    root.display()
                )));
                return snapshot;
            }
            Err(e) => {
                self.warn(&mut snapshot, SyncError::from_io(root, e));
                return snapshot;
            }
        }

        let walker = ignore::WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .build();

        for result in walker {
            match result {
                Ok(entry) => {
                    if entry.depth() == 0 {
                        continue;
                    }

                    let file_type = match entry.file_type() {
                        Some(ft) => ft,
                        None => continue,
                    };

                    let relative_path = match entry.path().strip_prefix(root) {
                        Ok(p) => p.to_path_buf(),
                        Err(_) => {
                            self.warn(
                                &mut snapshot,
                                SyncError::InvalidPath(format!(
                                    "{} is outside of {}",
                                    entry.path().display(),
                                    root.display()
                                )),
                            );
                            continue;
                        }
                    };

                    if file_type.is_dir() {
                        snapshot.dirs.insert(relative_path);
                    } else if file_type.is_file() {
                        snapshot.files.insert(relative_path);
                    }
                }
                Err(err) => {
                    if let Some(relative) = error_path(&err)
                        .and_then(|p| p.strip_prefix(root).ok())
                        .map(Path::to_path_buf)
                    {
                        snapshot.unreadable.insert(relative);
                    }
                    let error = walk_error(root, &err);
                    self.warn(&mut snapshot, error);
                }
            }
        }

        snapshot.set_scan_duration(start_time.elapsed());
        snapshot
    }

    /// Relative paths of every regular file under `root`
    pub fn scan_files(&self, root: &Path) -> PathSet {
        self.scan(root).files
    }

    /// Relative paths of every subdirectory under `root`
    pub fn scan_directories(&self, root: &Path) -> PathSet {
        self.scan(root).dirs
    }

    fn warn(&self, snapshot: &mut TreeSnapshot, error: SyncError) {
        snapshot.warnings += 1;
        self.sink.emit(&SyncEvent::ScanWarning {
            root: snapshot.root_path.clone(),
            error,
        });
    }
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}

fn walk_error(root: &Path, err: &ignore::Error) -> SyncError {
    let path = error_path(err)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());

    match err.io_error().map(|e| e.kind()) {
        Some(ErrorKind::PermissionDenied) => SyncError::PermissionDenied { path },
        Some(ErrorKind::NotFound) => SyncError::NotFound { path },
        _ => SyncError::Walk {
            path,
            message: err.to_string(),
        },
    }
}

/// True if `path` or one of its ancestors could not be read
pub fn is_under_unreadable(path: &Path, unreadable: &PathSet) -> bool {
    if unreadable.is_empty() {
        return false;
    }
    path.ancestors().any(|ancestor| unreadable.contains(ancestor))
}
