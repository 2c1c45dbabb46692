use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::{ArtifactSource, FetchError, ResolveError, VersionResolver, VersionTag};

/// Build a .tar.gz in memory with the given files.
/// Each entry is (path_in_tar, content).
pub fn build_tarball(entries: &[(&str, &str)]) -> Vec<u8> {
    let gz_buf = Vec::new();
    let encoder = GzEncoder::new(gz_buf, Compression::default());
    let mut archive = tar::Builder::new(encoder);

    for (file_path, content) in entries {
        let data = content.as_bytes();
        let mut header = tar::Header::new_gnu();
        header.set_path(file_path).unwrap();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        archive.append(&header, data).unwrap();
    }

    let encoder = archive.into_inner().unwrap();
    encoder.finish().unwrap()
}

/// Resolver whose answer can be swapped between calls.
pub struct ScriptedResolver {
    answer: Mutex<Option<VersionTag>>,
    calls: AtomicUsize,
}

impl ScriptedResolver {
    /// A resolver that reports `version`.
    pub fn online(version: &str) -> Self {
        Self {
            answer: Mutex::new(VersionTag::new(version)),
            calls: AtomicUsize::new(0),
        }
    }

    /// A resolver that always fails.
    pub fn offline() -> Self {
        Self {
            answer: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, version: Option<&str>) {
        *self.answer.lock().unwrap() = version.and_then(VersionTag::new);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl VersionResolver for ScriptedResolver {
    fn label(&self) -> &str {
        "scripted"
    }

    async fn resolve(&self) -> Result<VersionTag, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ResolveError::Network("remote unreachable".into()))
    }
}

/// How an [`InMemorySource`] behaves on the next download.
#[derive(Debug, Clone)]
pub enum Delivery {
    /// Write the whole archive.
    Complete(Vec<u8>),
    /// Write the first `n` bytes of the archive, then fail.
    Interrupted(Vec<u8>, usize),
    /// Fail before writing anything.
    Unreachable,
}

/// In-memory artifact source that counts downloads.
pub struct InMemorySource {
    delivery: Mutex<Delivery>,
    downloads: AtomicUsize,
}

impl InMemorySource {
    pub fn new(archive: Vec<u8>) -> Self {
        Self {
            delivery: Mutex::new(Delivery::Complete(archive)),
            downloads: AtomicUsize::new(0),
        }
    }

    /// Serve a single-root archive with the given relative files.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        Self::new(tarball_with_root(files))
    }

    pub fn set(&self, delivery: Delivery) {
        *self.delivery.lock().unwrap() = delivery;
    }

    /// Number of download attempts so far, successful or not.
    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

/// Wrap `files` under a GitHub-style `owner-repo-sha/` root.
pub fn tarball_with_root(files: &[(&str, &str)]) -> Vec<u8> {
    let rooted: Vec<(String, &str)> = files
        .iter()
        .map(|(path, content)| (format!("owner-repo-sha/{path}"), *content))
        .collect();
    let entries: Vec<(&str, &str)> = rooted.iter().map(|(p, c)| (p.as_str(), *c)).collect();
    build_tarball(&entries)
}

#[async_trait::async_trait]
impl ArtifactSource for InMemorySource {
    fn label(&self) -> &str {
        "in-memory"
    }

    async fn download(&self, dest: &Path) -> Result<u64, FetchError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let delivery = self.delivery.lock().unwrap().clone();

        match delivery {
            Delivery::Complete(bytes) => {
                tokio::fs::write(dest, &bytes).await?;
                Ok(bytes.len() as u64)
            }
            Delivery::Interrupted(bytes, n) => {
                tokio::fs::write(dest, &bytes[..n.min(bytes.len())]).await?;
                Err(FetchError::Network("connection reset".into()))
            }
            Delivery::Unreachable => Err(FetchError::Network("connection refused".into())),
        }
    }
}
