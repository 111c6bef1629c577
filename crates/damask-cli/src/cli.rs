//! CLI argument parsing using clap derive

use clap::Parser;
use std::path::PathBuf;

/// Link DAMASK executables into the binary directory and create the
/// per-release Marc subroutine aliases
#[derive(Parser, Debug, Default)]
#[command(name = "damask-symlinks")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// DAMASK root directory (default: found by walking up from the current directory)
    #[arg(long, env = "DAMASK_ROOT")]
    pub root: Option<PathBuf>,

    /// Do not look for the DAMASK root above this directory (ignored with --root)
    #[arg(long, env = "DAMASK_CEILING")]
    pub ceiling: Option<PathBuf>,

    /// Directory to place binary links in (default: DAMASK_BIN option or <root>/bin)
    #[arg(long, env = "DAMASK_BIN")]
    pub bin_dir: Option<PathBuf>,

    /// Link table to use instead of the built-in one (.toml, .json, .yaml)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Show the links that would be created without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,
}
