//! Symlink provisioning for DAMASK
//!
//! Links built solver executables into the binary directory and creates
//! per-release aliases of the Marc user subroutine.
//!
//! ```no_run
//! use damask_fs::Environment;
//! use damask_links::{LinkManifest, LinkProvisioner};
//!
//! let env = Environment::discover(".")?;
//! let provisioner = LinkProvisioner::from_env(&env, LinkManifest::builtin())?;
//! provisioner.provision(|record| println!("{record}"))?;
//! # Ok::<(), damask_links::Error>(())
//! ```

pub mod error;
pub mod manifest;
pub mod provisioner;
pub mod symlink;

pub use error::{Error, Result};
pub use manifest::{AliasSet, LinkManifest, LinkSpec, VersionAlias};
pub use provisioner::{LinkKind, LinkProvisioner, LinkRecord, ProvisionSummary};
pub use symlink::{check_replaceable, replace_symlink};
