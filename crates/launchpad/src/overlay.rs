use std::io;
use std::path::{Path, PathBuf};

/// Errors from copying the local override file into the tree.
///
/// None of these should stop a launch; the artifact may ship its own
/// defaults. Callers decide how loudly to report them.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("no local override at {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A local file copied verbatim into the extracted tree.
#[derive(Debug, Clone)]
pub struct Overlay {
    source: PathBuf,
    dest: PathBuf,
}

impl Overlay {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Copy the override into place, creating the destination directory and
    /// replacing whatever file is already there. Returns the bytes copied.
    pub async fn apply(&self) -> Result<u64, OverlayError> {
        let copy_err = |source| OverlayError::Copy {
            from: self.source.clone(),
            to: self.dest.clone(),
            source,
        };

        match tokio::fs::metadata(&self.source).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(OverlayError::Missing(self.source.clone())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(OverlayError::Missing(self.source.clone()));
            }
            Err(e) => return Err(copy_err(e)),
        }

        if let Some(parent) = self.dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(copy_err)?;
        }
        tokio::fs::copy(&self.source, &self.dest)
            .await
            .map_err(copy_err)
    }
}
