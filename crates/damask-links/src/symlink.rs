//! Replace-then-link primitive

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use damask_fs::NormalizedPath;
use tracing::debug;

use crate::{Error, Result};

/// Point `link` at `source`, removing whatever occupied `link` first.
///
/// Existing symlinks (dangling or not) and files are unlinked without
/// following them; a real directory is removed recursively. Returns
/// whether an entry was removed. Fails without touching anything if the
/// link path is the source or one of its ancestors.
pub fn replace_symlink(source: &NormalizedPath, link: &NormalizedPath) -> Result<bool> {
    check_replaceable(source, link)?;

    let link_path = link.to_native();
    let replaced = match fs::symlink_metadata(&link_path) {
        Ok(meta) => {
            remove_entry(&link_path, meta.file_type()).map_err(|e| Error::RemoveStale {
                path: link_path.clone(),
                source: e,
            })?;
            debug!(link = %link, "removed existing entry");
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            return Err(Error::RemoveStale {
                path: link_path,
                source: e,
            });
        }
    };

    let source_path = source.to_native();
    create_symlink(&source_path, &link_path).map_err(|e| Error::CreateLink {
        link: link_path.clone(),
        source_path,
        source: e,
    })?;

    Ok(replaced)
}

/// Check that replacing `link` cannot remove `source`.
///
/// Both paths are compared lexically and again with their parent
/// directories resolved, so a symlinked binary directory is seen through.
/// The final components are not resolved: an existing link at `link` is
/// removed as a link, never followed.
pub fn check_replaceable(source: &NormalizedPath, link: &NormalizedPath) -> Result<()> {
    let lexical = (source.to_native(), link.to_native());
    let resolved = (resolve_parent(&lexical.0), resolve_parent(&lexical.1));

    for (source_path, link_path) in [&lexical, &resolved] {
        if source_path == link_path {
            return Err(Error::SelfLink { path: link.to_native() });
        }
        if source_path.starts_with(link_path) {
            return Err(Error::EnclosesSource {
                link: link.to_native(),
                source_path: source.to_native(),
            });
        }
    }
    Ok(())
}

/// Canonicalize the parent of `path` and re-attach the file name. Falls
/// back to `path` when the parent does not exist yet.
fn resolve_parent(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => dunce::canonicalize(parent)
            .map(|parent| parent.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

#[cfg(not(windows))]
fn remove_entry(path: &Path, file_type: fs::FileType) -> io::Result<()> {
    if file_type.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(windows)]
fn remove_entry(path: &Path, file_type: fs::FileType) -> io::Result<()> {
    use std::os::windows::fs::FileTypeExt;

    if file_type.is_dir() {
        fs::remove_dir_all(path)
    } else if file_type.is_symlink_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(unix)]
fn create_symlink(source: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn create_symlink(source: &Path, link: &Path) -> io::Result<()> {
    if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, link)
    } else {
        std::os::windows::fs::symlink_file(source, link)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn norm(path: impl AsRef<Path>) -> NormalizedPath {
        NormalizedPath::new(path)
    }

    #[test]
    fn creates_link_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("DAMASK_spectral.exe");
        fs::write(&source, "").unwrap();
        let link = dir.path().join("DAMASK_spectral");

        let replaced = replace_symlink(&norm(&source), &norm(&link)).unwrap();

        assert!(!replaced);
        assert_eq!(fs::read_link(&link).unwrap(), source);
    }

    #[test]
    fn replaces_dangling_link() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("new");
        fs::write(&source, "").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("gone"), &link).unwrap();

        assert!(replace_symlink(&norm(&source), &norm(&link)).unwrap());
        assert_eq!(fs::read_link(&link).unwrap(), source);
    }

    #[test]
    fn replaces_link_to_directory_without_touching_target() {
        let dir = tempfile::tempdir().unwrap();
        let target_dir = dir.path().join("keep");
        fs::create_dir(&target_dir).unwrap();
        fs::write(target_dir.join("data"), "x").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target_dir, &link).unwrap();
        let source = dir.path().join("source");
        fs::write(&source, "").unwrap();

        replace_symlink(&norm(&source), &norm(&link)).unwrap();

        assert!(target_dir.join("data").exists());
        assert_eq!(fs::read_link(&link).unwrap(), source);
    }

    #[test]
    fn refuses_self_link() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DAMASK_spectral");
        fs::write(&path, "binary").unwrap();

        let err = replace_symlink(&norm(&path), &norm(&path)).unwrap_err();
        assert!(matches!(err, Error::SelfLink { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "binary");
    }

    #[test]
    fn refuses_link_over_ancestor_of_source() {
        let dir = tempfile::tempdir().unwrap();
        let code = dir.path().join("code");
        fs::create_dir(&code).unwrap();
        let source = code.join("code.exe");
        fs::write(&source, "elf").unwrap();

        let err = replace_symlink(&norm(&source), &norm(&code)).unwrap_err();

        assert!(matches!(err, Error::EnclosesSource { .. }));
        assert_eq!(fs::read_to_string(&source).unwrap(), "elf");
        assert!(!fs::symlink_metadata(&code).unwrap().file_type().is_symlink());
    }

    #[test]
    fn sibling_with_shared_prefix_is_not_an_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("code")).unwrap();
        let source = dir.path().join("code_v2");
        fs::write(&source, "").unwrap();
        let link = dir.path().join("code");

        assert!(replace_symlink(&norm(&source), &norm(&link)).unwrap());
        assert_eq!(fs::read_link(&link).unwrap(), source);
    }

    #[test]
    fn sees_through_symlinked_parent() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        let source = real.join("DAMASK_spectral");
        fs::write(&source, "binary").unwrap();
        let alias = dir.path().join("alias");
        std::os::unix::fs::symlink(&real, &alias).unwrap();

        let err = replace_symlink(&norm(&source), &norm(alias.join("DAMASK_spectral"))).unwrap_err();

        assert!(matches!(err, Error::SelfLink { .. }));
        assert_eq!(fs::read_to_string(&source).unwrap(), "binary");
    }

    #[test]
    fn creation_failure_carries_both_paths() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let link = dir.path().join("missing-parent").join("link");

        let err = replace_symlink(&norm(&source), &norm(&link)).unwrap_err();
        match err {
            Error::CreateLink { link: l, source_path, .. } => {
                assert_eq!(l, link);
                assert_eq!(source_path, source);
            }
            other => panic!("expected CreateLink, got {other:?}"),
        }
    }
}
