//! Text reads with path-carrying errors

use std::fs;
use std::io::ErrorKind;

use crate::{Error, NormalizedPath, Result};

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content from a file that may legitimately be absent.
///
/// Returns `Ok(None)` when the file does not exist; any other failure
/// is an error.
pub fn read_optional_text(path: &NormalizedPath) -> Result<Option<String>> {
    let native_path = path.to_native();
    match fs::read_to_string(&native_path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_read_of_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("absent"));
        assert!(read_optional_text(&path).unwrap().is_none());
    }

    #[test]
    fn optional_read_returns_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("options");
        std::fs::write(&file, "DAMASK_BIN=/opt/bin\n").unwrap();

        let content = read_optional_text(&NormalizedPath::new(&file)).unwrap();
        assert_eq!(content.as_deref(), Some("DAMASK_BIN=/opt/bin\n"));
    }

    #[test]
    fn read_text_reports_path_on_failure() {
        let path = NormalizedPath::new("/nonexistent/damask/options");
        let err = read_text(&path).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/damask/options"));
    }
}
