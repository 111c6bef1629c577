//! Well-known locations inside a DAMASK checkout.

use std::path::Path;

/// Standard project directories and files, relative to the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// The `code` directory (solver sources and build artifacts)
    CodeDir,
    /// The `installation` directory (setup scripts and options)
    InstallationDir,
    /// The `bin` directory (default binary output directory)
    BinDir,
    /// The `installation/options` file (`KEY=value` installation settings)
    OptionsFile,
}

impl ProjectPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CodeDir => "code",
            Self::InstallationDir => "installation",
            Self::BinDir => "bin",
            Self::OptionsFile => "installation/options",
        }
    }

    /// Directories whose joint presence marks a project root.
    pub fn root_markers() -> [Self; 2] {
        [Self::CodeDir, Self::InstallationDir]
    }
}

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ProjectPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
