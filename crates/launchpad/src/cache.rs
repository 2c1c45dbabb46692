use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::archive::{ArchiveError, extract_tarball};
use crate::layout::Layout;
use crate::source::{ArtifactSource, FetchError, VersionResolver};
use crate::store::LocalVersionStore;
use crate::version::VersionTag;

/// Errors that abort a refresh. The previously installed tree and its
/// version record are left as they were.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("download failed: {0}")]
    Download(#[from] FetchError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ArchiveError),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

fn io_err(context: impl Into<String>) -> impl FnOnce(io::Error) -> RefreshError {
    let context = context.into();
    move |source| RefreshError::Io { context, source }
}

/// What [`ArtifactCache::ensure_fresh`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The installed tree already matches the remote version.
    UpToDate { version: VersionTag },
    /// The remote could not be reached; the installed tree is reused as-is.
    Offline { version: Option<VersionTag> },
    /// A new archive was downloaded and installed. `version` is `None` when
    /// the remote version was unknown at refresh time, in which case no
    /// record is written and the next online run refreshes again.
    Refreshed {
        version: Option<VersionTag>,
        files: usize,
    },
}

/// Owns the extracted artifact tree and keeps it in step with the remote.
pub struct ArtifactCache<R, S> {
    layout: Layout,
    store: LocalVersionStore,
    resolver: R,
    source: S,
}

impl<R: VersionResolver, S: ArtifactSource> ArtifactCache<R, S> {
    pub fn new(layout: Layout, resolver: R, source: S) -> Self {
        let store = LocalVersionStore::new(layout.version_file());
        Self {
            layout,
            store,
            resolver,
            source,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn store(&self) -> &LocalVersionStore {
        &self.store
    }

    /// Make sure an extracted tree matching the remote is installed.
    ///
    /// The tree is reused when `force` is false, a tree exists, and either
    /// the record matches the remote version or the remote is unreachable.
    /// Anything else triggers a full refresh.
    pub async fn ensure_fresh(&self, force: bool) -> Result<RefreshOutcome, RefreshError> {
        let remote = match self.resolver.resolve().await {
            Ok(version) => {
                debug!(source = self.resolver.label(), %version, "resolved remote version");
                Some(version)
            }
            Err(e) => {
                warn!(source = self.resolver.label(), error = %e, "remote version unavailable");
                None
            }
        };

        let local = match self.store.read().await {
            Ok(version) => version,
            Err(e) => {
                warn!(
                    path = %self.store.path().display(),
                    error = %e,
                    "could not read version record, treating as absent"
                );
                None
            }
        };

        let tree_exists = dir_exists(&self.layout.tree_dir()).await;

        if !force && tree_exists {
            match remote {
                Some(ref version) if local.as_ref() == Some(version) => {
                    info!(%version, "artifact is up to date, skipping download");
                    return Ok(RefreshOutcome::UpToDate {
                        version: version.clone(),
                    });
                }
                None => {
                    warn!(
                        recorded = local.as_ref().map(VersionTag::as_str),
                        "reusing cached artifact while remote is unavailable"
                    );
                    return Ok(RefreshOutcome::Offline { version: local });
                }
                Some(_) => {}
            }
        }

        self.refresh(remote).await
    }

    async fn refresh(&self, remote: Option<VersionTag>) -> Result<RefreshOutcome, RefreshError> {
        let cache_root = self.layout.cache_root();
        tokio::fs::create_dir_all(cache_root)
            .await
            .map_err(io_err(format!(
                "failed to create cache directory {}",
                cache_root.display()
            )))?;

        let download = self.layout.download_path();
        let archive = self.layout.archive_path();

        remove_file_if_exists(&download)
            .await
            .map_err(io_err("failed to remove stale partial download"))?;

        info!(source = self.source.label(), "downloading artifact");
        let bytes = match self.source.download(&download).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = remove_file_if_exists(&download).await;
                return Err(e.into());
            }
        };

        tokio::fs::OpenOptions::new()
            .write(true)
            .open(&download)
            .await
            .map_err(io_err("failed to reopen downloaded archive"))?
            .sync_all()
            .await
            .map_err(io_err("failed to flush downloaded archive"))?;
        tokio::fs::rename(&download, &archive)
            .await
            .map_err(io_err("failed to move downloaded archive into place"))?;
        debug!(bytes, path = %archive.display(), "archive downloaded");

        let staging = self.layout.staging_dir();
        remove_dir_if_exists(&staging)
            .await
            .map_err(io_err("failed to clear staging directory"))?;

        info!("extracting artifact");
        let files = {
            let archive = archive.clone();
            let staging = staging.clone();
            tokio::task::spawn_blocking(move || extract_tarball(&archive, &staging)).await?
        };
        let files = match files {
            Ok(files) => files,
            Err(e) => {
                let _ = remove_dir_if_exists(&staging).await;
                return Err(e.into());
            }
        };

        // The record must go before the tree does: a crash past this point
        // leaves no record, and the next run refreshes.
        self.store
            .clear()
            .await
            .map_err(io_err("failed to clear version record"))?;

        let tree = self.layout.tree_dir();
        remove_dir_if_exists(&tree)
            .await
            .map_err(io_err(format!("failed to remove {}", tree.display())))?;
        tokio::fs::rename(&staging, &tree)
            .await
            .map_err(io_err(format!("failed to install {}", tree.display())))?;

        match &remote {
            Some(version) => {
                self.store
                    .write(version)
                    .await
                    .map_err(io_err("failed to write version record"))?;
                info!(%version, files, "artifact installed");
            }
            None => {
                warn!(files, "artifact installed without a version record");
            }
        }

        Ok(RefreshOutcome::Refreshed {
            version: remote,
            files,
        })
    }
}

async fn dir_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

async fn remove_dir_if_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
