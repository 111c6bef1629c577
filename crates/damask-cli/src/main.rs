//! DAMASK symlink setup
//!
//! Links the built solver executables into the binary directory and
//! creates the Marc user subroutine aliases for every supported release.
//! Run without arguments from anywhere inside a DAMASK checkout.

mod cli;
mod error;
mod provision;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    let cwd = std::env::current_dir()?;
    let stdout = std::io::stdout();
    provision::run_provision(&cli, &cwd, &mut stdout.lock())
}

/// Log to stderr so stdout carries only the link report. `--verbose`
/// forces debug level; otherwise only an explicit `RUST_LOG` enables
/// logging.
fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::default().add_directive(LevelFilter::DEBUG.into())
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return Ok(()),
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::user(format!("failed to set tracing subscriber: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_user() {
        let error = CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }

    #[test]
    fn test_links_error_is_transparent() {
        let error = CliError::from(damask_links::Error::InvalidTemplate {
            template: ".".into(),
        });
        assert_eq!(error.to_string(), "Invalid alias template: \".\"");
    }
}
