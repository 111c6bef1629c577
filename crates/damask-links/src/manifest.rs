//! Link manifest parsing and validation
//!
//! A manifest says which artifacts under the base directory get linked
//! into the binary directory, and which source file gets per-release
//! aliases. [`LinkManifest::builtin`] is the table shipped with DAMASK;
//! other tables can be loaded through [`damask_fs::ConfigStore`].

use std::collections::BTreeMap;

use damask_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Marc releases the user subroutine is aliased for.
pub const MARC_RELEASES: [u32; 3] = [2011, 2012, 2013];

fn default_base() -> String {
    "code".to_string()
}

/// A candidate artifact under the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    /// Subdirectory of the base directory
    pub directory: String,
    /// File inside `directory`; empty links the directory itself
    pub filename: String,
}

impl LinkSpec {
    pub fn new(directory: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
        }
    }

    /// Name of the link created in the binary directory.
    ///
    /// The file stem when a filename is given, otherwise the last
    /// component of the directory. `None` when neither yields a name,
    /// as for a bare `"."`.
    pub fn link_name(&self) -> Option<String> {
        if self.filename.is_empty() {
            NormalizedPath::new(&self.directory).file_name().map(str::to_owned)
        } else {
            NormalizedPath::new(&self.filename).file_stem().map(str::to_owned)
        }
    }

    /// The artifact path under `base`.
    pub fn source_path(&self, base: &NormalizedPath) -> NormalizedPath {
        base.join(&self.directory).join(&self.filename)
    }
}

/// One release year to alias the template for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionAlias {
    pub version: u32,
}

impl VersionAlias {
    /// Alias file name: `<stem><version>.<ext>`, or `<stem><version>`
    /// when the template has no extension.
    pub fn file_name(&self, template: &NormalizedPath) -> Option<String> {
        let stem = template.file_stem()?;
        Some(match template.extension() {
            Some(ext) => format!("{stem}{}.{ext}", self.version),
            None => format!("{stem}{}", self.version),
        })
    }
}

/// A template file and the releases to alias it for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSet {
    /// Template path relative to the base directory
    pub template: String,
    /// Release years, in output order
    #[serde(default)]
    pub versions: Vec<u32>,
}

impl AliasSet {
    pub fn aliases(&self) -> impl Iterator<Item = VersionAlias> + '_ {
        self.versions.iter().map(|&version| VersionAlias { version })
    }
}

/// The full set of links to provision.
///
/// Fields missing from a loaded file are empty, except `base`, which
/// defaults to `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkManifest {
    /// Base directory relative to the project root
    #[serde(default = "default_base")]
    pub base: String,

    /// Subdirectory of `base` to the filenames linked from it
    #[serde(default)]
    pub links: BTreeMap<String, Vec<String>>,

    /// Versioned aliases of a single template file
    #[serde(default)]
    pub aliases: Option<AliasSet>,
}

impl LinkManifest {
    /// The link table shipped with DAMASK: the spectral solver executable
    /// and the Marc user subroutine for each supported Marc release.
    pub fn builtin() -> Self {
        Self {
            base: default_base(),
            links: BTreeMap::from([(".".to_string(), vec!["DAMASK_spectral.exe".to_string()])]),
            aliases: Some(AliasSet {
                template: "DAMASK_marc.f90".to_string(),
                versions: MARC_RELEASES.to_vec(),
            }),
        }
    }

    /// Flatten the table into specs, in directory order then list order.
    pub fn specs(&self) -> Vec<LinkSpec> {
        self.links
            .iter()
            .flat_map(|(directory, files)| files.iter().map(move |file| LinkSpec::new(directory, file)))
            .collect()
    }

    /// Check that every entry yields a link name.
    pub fn validate(&self) -> Result<()> {
        for spec in self.specs() {
            if spec.link_name().is_none() {
                let reason = if spec.filename.is_empty() {
                    "directory has no final component to name the link after"
                } else {
                    "file name has no stem"
                };
                return Err(Error::InvalidSpec {
                    directory: spec.directory,
                    filename: spec.filename,
                    reason: reason.to_string(),
                });
            }
        }

        if let Some(aliases) = &self.aliases {
            if NormalizedPath::new(&aliases.template).file_stem().is_none() {
                return Err(Error::InvalidTemplate {
                    template: aliases.template.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_matches_shipped_links() {
        let manifest = LinkManifest::builtin();
        assert_eq!(manifest.base, "code");
        assert_eq!(manifest.specs(), vec![LinkSpec::new(".", "DAMASK_spectral.exe")]);

        let aliases = manifest.aliases.unwrap();
        assert_eq!(aliases.template, "DAMASK_marc.f90");
        assert_eq!(aliases.versions, vec![2011, 2012, 2013]);
    }

    #[test]
    fn link_name_from_file_stem() {
        let spec = LinkSpec::new(".", "DAMASK_spectral.exe");
        assert_eq!(spec.link_name().as_deref(), Some("DAMASK_spectral"));
    }

    #[test]
    fn link_name_from_directory_when_file_empty() {
        let spec = LinkSpec::new("processing/post", "");
        assert_eq!(spec.link_name().as_deref(), Some("post"));
    }

    #[test]
    fn link_name_for_bare_dot_directory_is_none() {
        assert_eq!(LinkSpec::new(".", "").link_name(), None);
        assert_eq!(LinkSpec::new("", "").link_name(), None);
    }

    #[test]
    fn source_path_resolves_dot_directory() {
        let base = NormalizedPath::new("/opt/damask/code");
        let spec = LinkSpec::new(".", "DAMASK_spectral.exe");
        assert_eq!(spec.source_path(&base).as_str(), "/opt/damask/code/DAMASK_spectral.exe");

        let dir_spec = LinkSpec::new("processing", "");
        assert_eq!(dir_spec.source_path(&base).as_str(), "/opt/damask/code/processing");
    }

    #[test]
    fn alias_file_name_inserts_version_before_extension() {
        let template = NormalizedPath::new("DAMASK_marc.f90");
        let alias = VersionAlias { version: 2011 };
        assert_eq!(alias.file_name(&template).as_deref(), Some("DAMASK_marc2011.f90"));
    }

    #[test]
    fn alias_file_name_without_extension() {
        let template = NormalizedPath::new("subroutine");
        let alias = VersionAlias { version: 2013 };
        assert_eq!(alias.file_name(&template).as_deref(), Some("subroutine2013"));
    }

    #[test]
    fn specs_follow_directory_then_list_order() {
        let mut manifest = LinkManifest::builtin();
        manifest.links = BTreeMap::from([
            ("b".to_string(), vec!["z.exe".to_string(), "a.exe".to_string()]),
            ("a".to_string(), vec!["m.exe".to_string()]),
        ]);

        let names: Vec<_> = manifest.specs().iter().filter_map(LinkSpec::link_name).collect();
        assert_eq!(names, vec!["m", "z", "a"]);
    }

    #[test]
    fn validate_rejects_unnameable_entry() {
        let mut manifest = LinkManifest::builtin();
        manifest.links.insert(".".to_string(), vec![String::new()]);
        assert!(matches!(manifest.validate(), Err(Error::InvalidSpec { .. })));
    }

    #[test]
    fn validate_rejects_template_without_name() {
        let mut manifest = LinkManifest::builtin();
        manifest.aliases = Some(AliasSet {
            template: ".".to_string(),
            versions: vec![2011],
        });
        assert!(matches!(manifest.validate(), Err(Error::InvalidTemplate { .. })));
    }

    #[test]
    fn builtin_validates() {
        assert!(LinkManifest::builtin().validate().is_ok());
    }
}
