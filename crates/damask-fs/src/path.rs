//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Construction resolves `.` and `..` components lexically and collapses
/// repeated separators, so two spellings of the same location compare
/// equal. Paths are converted to platform-native form only at I/O
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and cleans the result.
    /// Non-UTF-8 bytes are replaced, so paths that come from the
    /// filesystem or the user should go through [`NormalizedPath::try_new`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str),
        }
    }

    /// Like [`NormalizedPath::new`], but fails on a path that is not valid
    /// UTF-8 instead of rewriting it.
    pub fn try_new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_str().ok_or_else(|| Error::NonUtf8Path {
            path: path.to_path_buf(),
        })?;
        Ok(Self {
            inner: clean(path_str),
        })
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment and normalize the result.
    ///
    /// An absolute segment replaces the base entirely.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        if is_absolute_str(&segment_normalized) {
            return Self::new(segment_normalized);
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: clean(&trimmed[..=idx]),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the final component, if it names an entry.
    ///
    /// Roots and bare `.` / `..` have no file name.
    pub fn file_name(&self) -> Option<&str> {
        match self.inner.rsplit('/').next()? {
            "" | "." | ".." => None,
            name => Some(name),
        }
    }

    /// Get the file name without its last extension.
    ///
    /// A leading dot does not start an extension: `.bashrc` is its own stem.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            None | Some(0) => Some(name),
            Some(idx) => Some(&name[..idx]),
        }
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check whether the path is rooted.
    pub fn is_absolute(&self) -> bool {
        is_absolute_str(&self.inner)
    }

    /// Resolve a relative path against the current working directory.
    pub fn make_absolute(&self) -> Result<Self> {
        if self.is_absolute() {
            return Ok(self.clone());
        }
        let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
        Ok(Self::try_new(cwd)?.join(&self.inner))
    }

    /// Check if this path exists on the filesystem, following symlinks.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }
}

fn is_absolute_str(path: &str) -> bool {
    path.starts_with('/') || drive_prefix_len(path).is_some()
}

/// Length of a `C:` style drive prefix. Only meaningful on Windows.
fn drive_prefix_len(path: &str) -> Option<usize> {
    let bytes = path.as_bytes();
    if cfg!(windows) && bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        Some(2)
    } else {
        None
    }
}

/// Lexically normalize a path string.
///
/// Separators become `/`, empty and `.` components are dropped, and `..`
/// removes the preceding component. A rooted path never climbs above its
/// root. A leading `//` (but not `///`) is kept as a network prefix.
fn clean(raw: &str) -> String {
    let unified = raw.replace('\\', "/");

    let (prefix, rest) = if unified.starts_with("//") && !unified.starts_with("///") {
        ("//".to_string(), &unified[2..])
    } else if let Some(rest) = unified.strip_prefix('/') {
        ("/".to_string(), rest)
    } else if let Some(len) = drive_prefix_len(&unified) {
        (format!("{}/", &unified[..len]), &unified[len..])
    } else {
        (String::new(), unified.as_str())
    };

    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if prefix.is_empty() {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    if prefix.is_empty() && body.is_empty() {
        ".".to_string()
    } else {
        format!("{prefix}{body}")
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
