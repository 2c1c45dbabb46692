use std::path::{Path, PathBuf};

const VERSION_FILE: &str = "commit.sha";
const ARCHIVE_FILE: &str = "repo.tar.gz";

/// Where everything lives on disk, relative to one deployment root.
///
/// ```text
/// root/
///   config.js                              overlay source
///   .npm/xcache/.x1/.../.xN/               cache root
///     commit.sha                           version record
///     repo.tar.gz                          last downloaded archive
///     repo.tar.gz.part                     in-flight download
///     Base-bot-V4-main/                    extracted tree
///       config.js                          overlay destination
///     Base-bot-V4-main.staging/            in-flight extraction
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    cache_root: PathBuf,
    tree_name: String,
    overlay_name: String,
}

impl Layout {
    /// Build a layout with an explicit cache root.
    pub fn new(
        root: impl Into<PathBuf>,
        cache_root: impl Into<PathBuf>,
        tree_name: impl Into<String>,
        overlay_name: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            cache_root: cache_root.into(),
            tree_name: tree_name.into(),
            overlay_name: overlay_name.into(),
        }
    }

    /// Build a layout whose cache root sits `depth` hidden directories
    /// (`.x1/.x2/...`) below `root/<base...>`.
    pub fn nested(
        root: impl Into<PathBuf>,
        base: &[String],
        depth: usize,
        tree_name: impl Into<String>,
        overlay_name: impl Into<String>,
    ) -> Self {
        let root = root.into();
        let mut cache_root = root.clone();
        cache_root.extend(base);
        cache_root.extend((1..=depth).map(|i| format!(".x{i}")));
        Self::new(root, cache_root, tree_name, overlay_name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn version_file(&self) -> PathBuf {
        self.cache_root.join(VERSION_FILE)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.cache_root.join(ARCHIVE_FILE)
    }

    pub fn download_path(&self) -> PathBuf {
        self.cache_root.join(format!("{ARCHIVE_FILE}.part"))
    }

    pub fn tree_dir(&self) -> PathBuf {
        self.cache_root.join(&self.tree_name)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.cache_root.join(format!("{}.staging", self.tree_name))
    }

    pub fn overlay_source(&self) -> PathBuf {
        self.root.join(&self.overlay_name)
    }

    pub fn overlay_dest(&self) -> PathBuf {
        self.tree_dir().join(&self.overlay_name)
    }
}
