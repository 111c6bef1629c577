//! Project root resolution
//!
//! An [`Environment`] knows where the DAMASK checkout lives and where
//! binaries should be linked. Consumers depend on the [`PathResolver`]
//! trait so the root can be injected in tests.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::{Error, NormalizedPath, ProjectPath, Result, io};

/// Installation option naming the binary directory.
pub const BIN_DIR_OPTION: &str = "DAMASK_BIN";

/// Resolves paths relative to a project root.
pub trait PathResolver {
    /// Join `relative` onto the project root and normalize.
    fn rel_path(&self, relative: &str) -> NormalizedPath;

    /// The directory binaries are linked into.
    fn bin_dir(&self) -> NormalizedPath;
}

/// A resolved DAMASK checkout.
#[derive(Debug, Clone)]
pub struct Environment {
    root: NormalizedPath,
    options: BTreeMap<String, String>,
    bin_override: Option<NormalizedPath>,
}

impl Environment {
    /// Create an environment rooted at `root`.
    ///
    /// A relative root is resolved against the current directory. If
    /// `installation/options` exists under the root it is read; a missing
    /// options file is not an error.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = absolute(root.as_ref())?;
        let options_path = root.join(ProjectPath::OptionsFile.as_str());
        let options = match io::read_optional_text(&options_path)? {
            Some(content) => parse_options(&content),
            None => BTreeMap::new(),
        };

        debug!(root = %root, options = options.len(), "resolved DAMASK environment");

        Ok(Self {
            root,
            options,
            bin_override: None,
        })
    }

    /// Walk up from `start` to the first directory holding both `code/`
    /// and `installation/`.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        Self::discover_within(start, None)
    }

    /// Like [`Environment::discover`], but the walk stops after checking
    /// `ceiling`. A ceiling that is not an ancestor of `start` has no effect.
    pub fn discover_within(start: impl AsRef<Path>, ceiling: Option<&Path>) -> Result<Self> {
        let start = absolute(start.as_ref())?;
        let ceiling = ceiling.map(absolute).transpose()?;
        let mut current = Some(start.clone());

        while let Some(dir) = current {
            let is_root = ProjectPath::root_markers()
                .iter()
                .all(|marker| dir.join(marker.as_str()).is_dir());
            if is_root {
                return Self::new(dir.to_native());
            }
            if ceiling.as_ref() == Some(&dir) {
                debug!(ceiling = %dir, "root discovery stopped at ceiling");
                break;
            }
            current = dir.parent();
        }

        Err(Error::RootNotFound {
            start: start.to_native(),
        })
    }

    /// Override the binary directory. Relative paths resolve against the
    /// current directory, like any other command-line path.
    pub fn with_bin_dir(mut self, bin_dir: impl AsRef<Path>) -> Result<Self> {
        self.bin_override = Some(absolute(bin_dir.as_ref())?);
        Ok(self)
    }

    /// The project root.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Look up an installation option.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

impl PathResolver for Environment {
    fn rel_path(&self, relative: &str) -> NormalizedPath {
        self.root.join(relative)
    }

    fn bin_dir(&self) -> NormalizedPath {
        if let Some(bin_dir) = &self.bin_override {
            return bin_dir.clone();
        }
        match self.option(BIN_DIR_OPTION) {
            Some(configured) if !configured.is_empty() => self.root.join(configured),
            _ => self.root.join(ProjectPath::BinDir.as_str()),
        }
    }
}

fn absolute(path: &Path) -> Result<NormalizedPath> {
    NormalizedPath::try_new(dunce::simplified(path))?.make_absolute()
}

/// Parse `KEY=value` installation options.
///
/// Blank lines and `#` comments are skipped. Keys and values are trimmed,
/// and one pair of matching quotes around a value is removed. Lines
/// without `=` or with an empty key are ignored with a warning.
pub fn parse_options(content: &str) -> BTreeMap<String, String> {
    let mut options = BTreeMap::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                options.insert(key.trim().to_string(), unquote(value.trim()).to_string());
            }
            _ => warn!(line = index + 1, content = line, "ignoring malformed option line"),
        }
    }

    options
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
