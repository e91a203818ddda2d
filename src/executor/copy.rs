//! Atomic file copy implementation

use crate::types::SyncError;
use std::ffi::OsString;
use std::fs::{self, File, Metadata};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Suffix of the temporary file a copy is streamed into
pub const PART_SUFFIX: &str = ".foldsync-part";

/// Copies one file into the replica
#[derive(Debug, Default, Clone, Copy)]
pub struct FileReplicator;

impl FileReplicator {
    pub fn new() -> Self {
        Self
    }

    /// Copy `src` over `dest` atomically using the write-then-rename strategy
    ///
    /// 1. Create missing parent directories of `dest`
    /// 2. Stream into a hidden `.part` sibling and sync it to disk
    /// 3. Carry over permissions and mtime
    /// 4. Rename onto `dest`, replacing any existing file
    ///
    /// A failed copy leaves `dest` untouched and removes the `.part` file.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of bytes copied
    /// * `Err(SyncError)` - `NotFound`, `PermissionDenied`, `SameFile`,
    ///   `IsADirectory`, `InvalidPath` or another IO error
    ///
    /// # Example
    /// ```no_run
    /// use foldsync::executor::FileReplicator;
    /// use std::path::Path;
    ///
    /// let bytes = FileReplicator::new().copy(
    ///     Path::new("source/a.txt"),
    ///     Path::new("replica/a.txt"),
    /// )?;
    /// # Ok::<(), foldsync::types::SyncError>(())
    /// ```
    pub fn copy(&self, src: &Path, dest: &Path) -> Result<u64, SyncError> {
        let part_path = part_path_for(src, dest)?;

        let src_metadata = fs::metadata(src).map_err(|e| SyncError::from_io(src, e))?;
        if src_metadata.is_dir() {
            return Err(SyncError::IsADirectory {
                path: src.to_path_buf(),
            });
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| SyncError::from_io(parent, e))?;
        }

        if is_same_file(src, dest)? {
            return Err(SyncError::SameFile {
                path: dest.to_path_buf(),
            });
        }

        match write_part(src, &part_path, &src_metadata) {
            Ok(total_bytes) => {
                fs::rename(&part_path, dest).map_err(|e| {
                    let _ = fs::remove_file(&part_path);
                    SyncError::from_io(dest, e)
                })?;
                Ok(total_bytes)
            }
            Err(e) => {
                let _ = fs::remove_file(&part_path);
                Err(e)
            }
        }
    }
}

fn part_path_for(src: &Path, dest: &Path) -> Result<PathBuf, SyncError> {
    if src.as_os_str().is_empty() || dest.as_os_str().is_empty() {
        return Err(SyncError::InvalidPath(
            "source and destination must not be empty".to_string(),
        ));
    }

    let file_name = dest.file_name().ok_or_else(|| {
        SyncError::InvalidPath(format!("{} does not name a file", dest.display()))
    })?;

    let mut part_name = OsString::from(".");
    part_name.push(file_name);
    part_name.push(PART_SUFFIX);
    Ok(dest.with_file_name(part_name))
}

// The rename replaces a symlink at `dest` instead of writing through it, so
// only a real entry can alias `src`.
fn is_same_file(src: &Path, dest: &Path) -> Result<bool, SyncError> {
    match fs::symlink_metadata(dest) {
        Ok(metadata) if !metadata.file_type().is_symlink() => {}
        _ => return Ok(false),
    }
    let src_real = fs::canonicalize(src).map_err(|e| SyncError::from_io(src, e))?;
    let dest_real = match fs::canonicalize(dest) {
        Ok(path) => path,
        Err(_) => return Ok(false),
    };
    Ok(src_real == dest_real)
}

fn write_part(src: &Path, part_path: &Path, src_metadata: &Metadata) -> Result<u64, SyncError> {
    let mut src_file = File::open(src).map_err(|e| SyncError::from_io(src, e))?;
    let mut part_file = File::create(part_path).map_err(|e| SyncError::from_io(part_path, e))?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .map_err(|e| SyncError::from_io(src, e))?;

        if bytes_read == 0 {
            break; // EOF
        }

        part_file
            .write_all(&buffer[0..bytes_read])
            .map_err(|e| SyncError::from_io(part_path, e))?;
        total_bytes += bytes_read as u64;
    }

    part_file
        .sync_all()
        .map_err(|e| SyncError::from_io(part_path, e))?;

    // Drop the file handle before rename (required on Windows)
    drop(part_file);

    fs::set_permissions(part_path, src_metadata.permissions())
        .map_err(|e| SyncError::from_io(part_path, e))?;

    let mtime = src_metadata
        .modified()
        .map_err(|e| SyncError::from_io(src, e))?;
    filetime::set_file_mtime(part_path, filetime::FileTime::from_system_time(mtime))
        .map_err(|e| SyncError::from_io(part_path, e))?;

    Ok(total_bytes)
}
