use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default backing file, relative to the working directory.
pub const DEFAULT_FILE_PATH: &str = "file.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON document the store is mirrored to.
    pub file_path: PathBuf,
    /// Indent the saved document instead of writing it on one line.
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            pretty: false,
        }
    }
}

impl StoreConfig {
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }
}
