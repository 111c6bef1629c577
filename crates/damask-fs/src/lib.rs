//! Filesystem layer for the DAMASK setup tools
//!
//! Provides normalized path handling, project root resolution and
//! format-agnostic configuration loading.

pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::ProjectPath;
pub use environment::{Environment, PathResolver, parse_options};
pub use error::{Error, Result};
pub use path::NormalizedPath;
