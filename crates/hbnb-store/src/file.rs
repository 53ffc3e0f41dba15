//! Single-file JSON backend.
//!
//! Writes go to a temporary file in the target's directory which is then
//! renamed over the target, so a crash or I/O error mid-write never leaves a
//! truncated document at the path `read` uses.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::traits::Backend;

#[derive(Clone, Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the temporary file is created in. Must be on the same
    /// filesystem as the target for the rename to be atomic.
    fn staging_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Backend for JsonFileBackend {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, data: &[u8]) -> io::Result<()> {
        let dir = self.staging_dir();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), bytes = data.len(), "document written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("absent.json"));
        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("file.json"));
        backend.write(b"{}").unwrap();
        assert_eq!(backend.read().unwrap().unwrap(), b"{}");
    }

    #[test]
    fn write_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("file.json"));
        backend.write(b"{\"a\": 1, \"long\": \"content\"}").unwrap();
        backend.write(b"{}").unwrap();
        assert_eq!(backend.read().unwrap().unwrap(), b"{}");
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("file.json");
        let backend = JsonFileBackend::new(&path);
        backend.write(b"[]").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn no_temporary_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("file.json"));
        backend.write(b"{}").unwrap();
        backend.write(b"{}").unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn failed_write_keeps_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.json");
        let backend = JsonFileBackend::new(&path);
        backend.write(b"{\"kept\": true}").unwrap();

        // A directory at the target path makes the final rename fail.
        let blocked = JsonFileBackend::new(dir.path());
        assert!(blocked.write(b"{}").is_err());

        assert_eq!(backend.read().unwrap().unwrap(), b"{\"kept\": true}");
    }

    #[test]
    fn bare_file_name_stages_in_current_dir() {
        let backend = JsonFileBackend::new("file.json");
        assert_eq!(backend.staging_dir(), Path::new("."));
        assert_eq!(backend.location(), "file.json");
    }
}
