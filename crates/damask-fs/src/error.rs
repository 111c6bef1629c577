//! Error types for damask-fs

use std::path::PathBuf;

/// Result type for damask-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in damask-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Path is not valid UTF-8: {path:?}")]
    NonUtf8Path { path: PathBuf },

    #[error("No DAMASK root (a directory containing code/ and installation/) above {start}")]
    RootNotFound { start: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
