//! Set-difference plans for directories and files

use crate::scanner::is_under_unreadable;
use crate::types::{PathSet, TreeSnapshot};
use std::path::PathBuf;

/// Directory differences between source and replica
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryPlan {
    /// In source, absent from replica
    pub missing: PathSet,

    /// In replica, absent from source
    pub extra: PathSet,

    /// Replica-only directories kept because the matching source subtree
    /// could not be read
    pub held_back: PathSet,
}

impl DirectoryPlan {
    /// Compare directory sets
    ///
    /// # Example
    /// ```
    /// use foldsync::diff::DirectoryPlan;
    /// use foldsync::types::PathSet;
    /// use std::path::PathBuf;
    ///
    /// let source: PathSet = [PathBuf::from("new")].into_iter().collect();
    /// let replica: PathSet = [PathBuf::from("old")].into_iter().collect();
    ///
    /// let plan = DirectoryPlan::new(&source, &replica, &PathSet::new());
    /// assert!(plan.missing.contains(&PathBuf::from("new")));
    /// assert!(plan.extra.contains(&PathBuf::from("old")));
    /// ```
    pub fn new(source_dirs: &PathSet, replica_dirs: &PathSet, source_unreadable: &PathSet) -> Self {
        let (extra, held_back) =
            split_held_back(replica_dirs.difference(source_dirs), source_unreadable);
        Self {
            missing: source_dirs.difference(replica_dirs),
            extra,
            held_back,
        }
    }

    pub fn from_snapshots(source: &TreeSnapshot, replica: &TreeSnapshot) -> Self {
        Self::new(&source.dirs, &replica.dirs, &source.unreadable)
    }

    /// Extra directories not nested under another extra directory
    ///
    /// Removing these recursively removes every extra directory.
    pub fn removal_roots(&self) -> Vec<&PathBuf> {
        let mut roots: Vec<&PathBuf> = Vec::new();
        for path in &self.extra {
            // Sorted order puts a parent right before its descendants.
            let covered = roots
                .last()
                .map(|root| path.starts_with(root.as_path()))
                .unwrap_or(false);
            if !covered {
                roots.push(path);
            }
        }
        roots
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// File differences between source and replica
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilePlan {
    /// In both trees; content decides whether to update
    pub common: PathSet,

    /// In source, absent from replica
    pub missing: PathSet,

    /// In replica, absent from source
    pub extra: PathSet,

    /// Replica-only files kept because the matching source subtree could
    /// not be read
    pub held_back: PathSet,
}

impl FilePlan {
    /// Compare file sets
    pub fn new(source_files: &PathSet, replica_files: &PathSet, source_unreadable: &PathSet) -> Self {
        let (extra, held_back) =
            split_held_back(replica_files.difference(source_files), source_unreadable);
        Self {
            common: source_files.intersection(replica_files),
            missing: source_files.difference(replica_files),
            extra,
            held_back,
        }
    }

    pub fn from_snapshots(source: &TreeSnapshot, replica: &TreeSnapshot) -> Self {
        Self::new(&source.files, &replica.files, &source.unreadable)
    }

    pub fn is_empty(&self) -> bool {
        self.common.is_empty() && self.missing.is_empty() && self.extra.is_empty()
    }
}

fn split_held_back(extra: PathSet, source_unreadable: &PathSet) -> (PathSet, PathSet) {
    if source_unreadable.is_empty() {
        return (extra, PathSet::new());
    }

    let mut kept = PathSet::new();
    let mut held_back = PathSet::new();
    for path in extra.iter() {
        if is_under_unreadable(path.as_path(), source_unreadable) {
            held_back.insert(path.clone());
        } else {
            kept.insert(path.clone());
        }
    }
    (kept, held_back)
}
