//! Chat history persisted as one JSON document on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parley_core::chat::snapshot::SnapshotStore;
use parley_types::error::StoreError;

/// A [`SnapshotStore`] backed by a single file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(format!(
                "failed to read {}: {err}",
                self.path.display()
            ))),
        }
    }

    async fn write(&self, document: &str) -> Result<(), StoreError> {
        let io_err = |err: std::io::Error| {
            StoreError::Io(format!("failed to write {}: {err}", self.path.display()))
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, document).await.map_err(io_err)?;
        tokio::fs::rename(&temp, &self.path).await.map_err(io_err)
    }
}
