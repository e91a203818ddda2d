//! PathSet and TreeSnapshot - Directory structure representation

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Ordered set of paths relative to a sync root
///
/// Ordering is lexicographic by component, so a directory always sorts
/// before anything beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSet {
    paths: BTreeSet<PathBuf>,
}

impl PathSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a relative path. Returns false if it was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    /// Check if a path exists in the set
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Return the number of paths in the set
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterator over the paths in order
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    /// Paths in `self` that are absent from `other`
    pub fn difference(&self, other: &PathSet) -> PathSet {
        self.paths.difference(&other.paths).cloned().collect()
    }

    /// Paths present in both sets
    pub fn intersection(&self, other: &PathSet) -> PathSet {
        self.paths.intersection(&other.paths).cloned().collect()
    }
}

impl FromIterator<PathBuf> for PathSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a PathBuf;
    type IntoIter = std::collections::btree_set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Result of one walk over a sync root
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSnapshot {
    /// Regular files, relative to `root_path`
    pub files: PathSet,

    /// Subdirectories, relative to `root_path` (the root itself excluded)
    pub dirs: PathSet,

    /// Entries the walker failed to read; their subtrees are incomplete
    pub unreadable: PathSet,

    /// Number of scan warnings reported for this walk
    pub warnings: usize,

    /// Scan metadata
    pub scan_duration: Duration,
    pub root_path: PathBuf,
}

impl TreeSnapshot {
    /// Create a new empty snapshot
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            files: PathSet::new(),
            dirs: PathSet::new(),
            unreadable: PathSet::new(),
            warnings: 0,
            scan_duration: Duration::from_secs(0),
            root_path,
        }
    }

    /// Set the scan duration after scanning completes
    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.scan_duration = duration;
    }

    /// Check if the snapshot holds no files and no directories
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(paths: &[&str]) -> PathSet {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_new_set_is_empty() {
        let set = PathSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_duplicate_insertion() {
        let mut set = PathSet::new();
        assert!(set.insert(PathBuf::from("a.txt")));
        assert!(!set.insert(PathBuf::from("a.txt")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_separator_normalization() {
        let mut set = PathSet::new();
        set.insert(PathBuf::from("dir/file.txt"));

        assert!(set.contains(Path::new("dir//file.txt")));
        assert!(set.contains(&Path::new("dir").join("file.txt")));
    }

    #[test]
    fn test_case_sensitive() {
        let set = set_of(&["Readme.md"]);
        assert!(!set.contains(Path::new("readme.md")));
    }

    #[test]
    fn test_difference_and_intersection() {
        let source = set_of(&["a.txt", "b.txt", "sub/c.txt"]);
        let replica = set_of(&["b.txt", "stale.txt"]);

        assert_eq!(source.difference(&replica), set_of(&["a.txt", "sub/c.txt"]));
        assert_eq!(replica.difference(&source), set_of(&["stale.txt"]));
        assert_eq!(source.intersection(&replica), set_of(&["b.txt"]));
    }

    #[test]
    fn test_parents_iterate_before_children() {
        let set = set_of(&["a/b/c", "a", "a/b", "a-sibling"]);
        let ordered: Vec<_> = set.iter().map(|p| p.to_string_lossy().into_owned()).collect();

        let a = ordered.iter().position(|p| p == "a").unwrap();
        let ab = ordered.iter().position(|p| p == "a/b").unwrap();
        let abc = ordered.iter().position(|p| p == "a/b/c").unwrap();
        assert!(a < ab && ab < abc);
    }

    #[test]
    fn test_snapshot_new() {
        let root = PathBuf::from("/test/root");
        let snapshot = TreeSnapshot::new(root.clone());

        assert_eq!(snapshot.root_path, root);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.scan_duration, Duration::from_secs(0));
    }

    #[test]
    fn test_snapshot_scan_duration() {
        let mut snapshot = TreeSnapshot::new(PathBuf::from("/root"));
        snapshot.set_scan_duration(Duration::from_millis(1500));
        assert_eq!(snapshot.scan_duration, Duration::from_millis(1500));
    }
}
