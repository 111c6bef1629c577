//! Link provisioning
//!
//! Every run recreates each link whose source exists: binary links
//! first, then versioned aliases. Missing sources are skipped. The first
//! filesystem failure aborts the run and leaves earlier links in place.

use std::fmt;
use std::fs;

use damask_fs::{NormalizedPath, PathResolver};
use tracing::{debug, info};

use crate::manifest::LinkManifest;
use crate::symlink::{check_replaceable, replace_symlink};
use crate::{Error, Result};

/// Which part of the manifest a link comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// An artifact linked into the binary directory
    Binary,
    /// A per-release alias next to the template file
    VersionAlias,
}

/// One link, created or planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub kind: LinkKind,
    /// Where the symlink lives
    pub link: NormalizedPath,
    /// What it points at
    pub source: NormalizedPath,
}

impl fmt::Display for LinkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.link, self.source)
    }
}

/// Counts from a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionSummary {
    /// Links created, including replacements
    pub created: usize,
    /// Of those, links that replaced an existing entry
    pub replaced: usize,
    /// Entries skipped because their source does not exist
    pub skipped: usize,
}

/// Creates binary links and versioned aliases for a manifest.
#[derive(Debug, Clone)]
pub struct LinkProvisioner {
    base: NormalizedPath,
    bin_dir: NormalizedPath,
    manifest: LinkManifest,
}

impl LinkProvisioner {
    /// Create a provisioner. Relative directories are resolved against
    /// the current directory so link targets are always absolute.
    pub fn new(base: NormalizedPath, bin_dir: NormalizedPath, manifest: LinkManifest) -> Result<Self> {
        manifest.validate()?;
        Ok(Self {
            base: base.make_absolute()?,
            bin_dir: bin_dir.make_absolute()?,
            manifest,
        })
    }

    /// Create a provisioner whose base and binary directories come from
    /// a project environment.
    pub fn from_env(resolver: &impl PathResolver, manifest: LinkManifest) -> Result<Self> {
        let base = resolver.rel_path(&manifest.base);
        Self::new(base, resolver.bin_dir(), manifest)
    }

    pub fn base(&self) -> &NormalizedPath {
        &self.base
    }

    pub fn bin_dir(&self) -> &NormalizedPath {
        &self.bin_dir
    }

    /// Every link the manifest describes, whether or not its source exists.
    fn candidates(&self) -> Vec<LinkRecord> {
        let binaries = self.manifest.specs().into_iter().filter_map(|spec| {
            let name = spec.link_name()?;
            Some(LinkRecord {
                kind: LinkKind::Binary,
                link: self.bin_dir.join(&name),
                source: spec.source_path(&self.base),
            })
        });

        let aliases = self.manifest.aliases.iter().flat_map(|set| {
            let template = self.base.join(&set.template);
            let dir = template.parent().unwrap_or_else(|| self.base.clone());
            set.aliases()
                .filter_map(|alias| alias.file_name(&template))
                .map(|name| LinkRecord {
                    kind: LinkKind::VersionAlias,
                    link: dir.join(&name),
                    source: template.clone(),
                })
                .collect::<Vec<_>>()
        });

        binaries.chain(aliases).collect()
    }

    /// The links a run would create given the current filesystem.
    ///
    /// Fails on the first link that a run would refuse to create, so a dry
    /// run reports the same error a real run would hit.
    pub fn plan(&self) -> Result<Vec<LinkRecord>> {
        let mut records = Vec::new();
        for record in self.candidates() {
            if !record.source.exists() {
                continue;
            }
            check_replaceable(&record.source, &record.link)?;
            records.push(record);
        }
        Ok(records)
    }

    /// Create every link whose source exists.
    ///
    /// `on_link` is called right after each link is made, so callers can
    /// report progress even if a later link fails.
    pub fn provision(&self, mut on_link: impl FnMut(&LinkRecord)) -> Result<ProvisionSummary> {
        let mut summary = ProvisionSummary::default();

        for record in self.candidates() {
            if !record.source.exists() {
                debug!(source = %record.source, "source missing, skipping");
                summary.skipped += 1;
                continue;
            }

            if record.kind == LinkKind::Binary {
                self.ensure_bin_dir()?;
            }

            if replace_symlink(&record.source, &record.link)? {
                summary.replaced += 1;
            }
            summary.created += 1;
            on_link(&record);
        }

        info!(
            created = summary.created,
            replaced = summary.replaced,
            skipped = summary.skipped,
            "link provisioning finished"
        );
        Ok(summary)
    }

    fn ensure_bin_dir(&self) -> Result<()> {
        if self.bin_dir.is_dir() {
            return Ok(());
        }
        let path = self.bin_dir.to_native();
        fs::create_dir_all(&path).map_err(|e| Error::CreateDir { path, source: e })?;
        debug!(bin_dir = %self.bin_dir, "created binary directory");
        Ok(())
    }
}
