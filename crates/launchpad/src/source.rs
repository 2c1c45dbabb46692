use std::path::Path;
use std::sync::Arc;

use crate::version::VersionTag;

/// Errors from asking the remote which version is current.
///
/// These are never fatal on their own: the cache treats any of them as
/// "remote unavailable" and falls back to what is already on disk.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

/// Errors from downloading an artifact archive.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Answers "which snapshot of the artifact is current?".
#[async_trait::async_trait]
pub trait VersionResolver: Send + Sync {
    /// Human-readable label identifying the remote.
    fn label(&self) -> &str;

    /// Query the remote for its current version.
    async fn resolve(&self) -> Result<VersionTag, ResolveError>;
}

/// Produces the artifact as a gzipped tar archive.
#[async_trait::async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Human-readable label identifying the remote.
    fn label(&self) -> &str;

    /// Write the complete archive to `dest`, returning the number of bytes
    /// written. Implementations may leave a partial file behind on error;
    /// callers only ever point `dest` at a scratch path.
    async fn download(&self, dest: &Path) -> Result<u64, FetchError>;
}

#[async_trait::async_trait]
impl<T: VersionResolver + ?Sized> VersionResolver for Arc<T> {
    fn label(&self) -> &str {
        (**self).label()
    }

    async fn resolve(&self) -> Result<VersionTag, ResolveError> {
        (**self).resolve().await
    }
}

#[async_trait::async_trait]
impl<T: ArtifactSource + ?Sized> ArtifactSource for Arc<T> {
    fn label(&self) -> &str {
        (**self).label()
    }

    async fn download(&self, dest: &Path) -> Result<u64, FetchError> {
        (**self).download(dest).await
    }
}
