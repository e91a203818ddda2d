//! Content hashing and equality

use crate::types::SyncError;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Content digest of a file
pub type ContentDigest = [u8; 32];

/// Compute Blake3 hash of a file
///
/// The file is streamed in 64KB chunks for memory efficiency.
///
/// # Arguments
/// * `file_path` - Path to the file to hash
///
/// # Returns
/// * `Ok([u8; 32])` - 32-byte Blake3 hash
/// * `Err(SyncError)` - the file cannot be opened or read
///
/// # Example
/// ```no_run
/// use foldsync::hash::compute_hash;
/// use std::path::Path;
///
/// let hash = compute_hash(Path::new("file.txt"))?;
/// # Ok::<(), foldsync::types::SyncError>(())
/// ```
pub fn compute_hash(file_path: &Path) -> Result<ContentDigest, SyncError> {
    let mut file = File::open(file_path).map_err(|e| SyncError::from_io(file_path, e))?;

    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| SyncError::from_io(file_path, e))?;

        if bytes_read == 0 {
            break; // EOF
        }

        hasher.update(&buffer[0..bytes_read]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Decides whether two files hold identical bytes
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentComparator;

impl ContentComparator {
    pub fn new() -> Self {
        Self
    }

    /// Compare the full content of `path_a` and `path_b`
    ///
    /// Files of different length are unequal without reading them; otherwise
    /// both are hashed.
    ///
    /// # Errors
    /// Any failure to stat or read either file (missing, permission denied,
    /// a directory). The caller must treat an error as "not confirmed
    /// equal".
    pub fn are_equal(&self, path_a: &Path, path_b: &Path) -> Result<bool, SyncError> {
        let len_a = file_len(path_a)?;
        let len_b = file_len(path_b)?;
        if len_a != len_b {
            return Ok(false);
        }

        Ok(compute_hash(path_a)? == compute_hash(path_b)?)
    }
}

fn file_len(path: &Path) -> Result<u64, SyncError> {
    let metadata = fs::metadata(path).map_err(|e| SyncError::from_io(path, e))?;
    if metadata.is_dir() {
        return Err(SyncError::IsADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(metadata.len())
}
