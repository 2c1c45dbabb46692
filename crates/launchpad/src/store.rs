use std::io;
use std::path::{Path, PathBuf};

use crate::version::VersionTag;

/// The on-disk record of which version is currently extracted.
///
/// A single small text file holding the tag. The record is only written
/// after a tree has been fully installed, and is cleared before an
/// installed tree is touched.
#[derive(Debug, Clone)]
pub struct LocalVersionStore {
    path: PathBuf,
}

impl LocalVersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the recorded version. A missing or blank file is `None`.
    pub async fn read(&self) -> io::Result<Option<VersionTag>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(VersionTag::new(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Record `version`, creating parent directories as needed.
    pub async fn write(&self, version: &VersionTag) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, version.as_str()).await
    }

    /// Remove the record. Clearing an absent record is not an error.
    pub async fn clear(&self) -> io::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
