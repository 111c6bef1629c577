//! The link provisioning run behind the binary

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use damask_fs::{ConfigStore, Environment, NormalizedPath};
use damask_links::{LinkManifest, LinkProvisioner};

use crate::cli::Cli;
use crate::error::Result;

/// Resolve the environment and manifest for `cli`, then link.
///
/// Relative command-line paths are taken relative to `cwd`. One line per
/// link goes to `out`.
pub fn run_provision(cli: &Cli, cwd: &Path, out: &mut impl Write) -> Result<()> {
    let env = match &cli.root {
        Some(root) => Environment::new(cwd.join(root))?,
        None => {
            let ceiling = cli.ceiling.as_ref().map(|dir| cwd.join(dir));
            Environment::discover_within(cwd, ceiling.as_deref())?
        }
    };
    let env = match &cli.bin_dir {
        Some(bin_dir) => env.with_bin_dir(cwd.join(bin_dir))?,
        None => env,
    };

    let manifest = match &cli.manifest {
        Some(path) => ConfigStore::new().load(&NormalizedPath::try_new(cwd.join(path))?)?,
        None => LinkManifest::builtin(),
    };

    let provisioner = LinkProvisioner::from_env(&env, manifest)?;
    tracing::debug!(base = %provisioner.base(), bin_dir = %provisioner.bin_dir(), "provisioning links");

    if cli.dry_run {
        for record in provisioner.plan()? {
            writeln!(out, "{} {record}", "would link:".yellow())?;
        }
        return Ok(());
    }

    let mut written = Ok(());
    provisioner.provision(|record| {
        if written.is_ok() {
            written = writeln!(out, "{record}");
        }
    })?;
    written?;

    Ok(())
}
