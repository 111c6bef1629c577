//! [`TestTree`] builder for link provisioning scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// What occupies a path, as seen without following symlinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(Vec<u8>),
    Dir,
    Symlink(PathBuf),
}

/// A temporary directory shaped like a DAMASK checkout.
///
/// # Example
///
/// ```rust,no_run
/// use damask_test_utils::TestTree;
///
/// let tree = TestTree::damask();
/// tree.write_file("code/DAMASK_spectral.exe", "binary");
/// tree.assert_not_exists("bin/DAMASK_spectral");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a tree with the `code/`, `installation/` and `bin/`
    /// directories of a checkout.
    pub fn damask() -> Self {
        let tree = Self::new();
        tree.mkdir("code");
        tree.mkdir("installation");
        tree.mkdir("bin");
        tree
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Create a directory (and parents).
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Write a file, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Create a symlink at `rel` pointing at `target`, which may be absent.
    #[cfg(unix)]
    pub fn symlink(&self, target: impl AsRef<Path>, rel: &str) -> PathBuf {
        let path = self.path(rel);
        std::os::unix::fs::symlink(target, &path).unwrap();
        path
    }

    /// Read the target of the symlink at `rel`.
    pub fn read_link(&self, rel: &str) -> PathBuf {
        fs::read_link(self.path(rel))
            .unwrap_or_else(|e| panic!("Expected symlink at {}: {e}", self.path(rel).display()))
    }

    /// Assert that `rel` is a symlink whose target is exactly `target`.
    ///
    /// # Panics
    /// Panics with a descriptive message otherwise.
    pub fn assert_symlink_to(&self, rel: &str, target: &Path) {
        let path = self.path(rel);
        let meta = fs::symlink_metadata(&path)
            .unwrap_or_else(|_| panic!("Expected symlink to exist: {}", path.display()));
        assert!(
            meta.file_type().is_symlink(),
            "Expected {} to be a symlink",
            path.display()
        );
        assert_eq!(self.read_link(rel), target, "Wrong target for {}", path.display());
    }

    /// Assert that nothing, not even a dangling symlink, occupies `rel`.
    ///
    /// # Panics
    /// Panics with a descriptive message if an entry exists.
    pub fn assert_not_exists(&self, rel: &str) {
        let path = self.path(rel);
        assert!(
            fs::symlink_metadata(&path).is_err(),
            "Expected nothing at: {}",
            path.display()
        );
    }

    /// Record every entry in the tree, keyed by relative path.
    ///
    /// Symlinks are recorded by target and not followed.
    pub fn snapshot(&self) -> BTreeMap<String, Entry> {
        let mut entries = BTreeMap::new();
        collect(self.root(), self.root(), &mut entries);
        entries
    }
}

fn collect(root: &Path, dir: &Path, entries: &mut BTreeMap<String, Entry>) {
    for item in fs::read_dir(dir).unwrap() {
        let path = item.unwrap().path();
        let rel = path
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        let file_type = fs::symlink_metadata(&path).unwrap().file_type();

        if file_type.is_symlink() {
            entries.insert(rel, Entry::Symlink(fs::read_link(&path).unwrap()));
        } else if file_type.is_dir() {
            entries.insert(rel, Entry::Dir);
            collect(root, &path, entries);
        } else {
            entries.insert(rel, Entry::File(fs::read(&path).unwrap()));
        }
    }
}
