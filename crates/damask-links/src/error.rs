//! Error types for damask-links

use std::path::PathBuf;

/// Result type for damask-links operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while provisioning links
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An existing entry at the link location could not be removed
    #[error("Failed to remove existing entry at {path}: {source}")]
    RemoveStale {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The symlink itself could not be created
    #[error("Failed to link {link} --> {source_path}: {source}")]
    CreateLink {
        link: PathBuf,
        source_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The binary directory could not be created
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A link would replace its own source
    #[error("Refusing to replace {path} with a link to itself")]
    SelfLink { path: PathBuf },

    /// Replacing the link would remove a directory holding its source
    #[error("Refusing to replace {link}: it contains the link source {source_path}")]
    EnclosesSource { link: PathBuf, source_path: PathBuf },

    /// A manifest entry from which no link name can be derived
    #[error("Invalid link entry (directory {directory:?}, file {filename:?}): {reason}")]
    InvalidSpec {
        directory: String,
        filename: String,
        reason: String,
    },

    /// An alias template without a usable file name
    #[error("Invalid alias template: {template:?}")]
    InvalidTemplate { template: String },

    /// Filesystem error from damask-fs
    #[error(transparent)]
    Fs(#[from] damask_fs::Error),
}
