use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment root. Defaults to the current directory.
    pub root: Option<PathBuf>,
    /// Override for the GitHub API base URL.
    pub api_base_url: Option<String>,
    pub repo: RepoSection,
    pub cache: CacheSection,
    pub overlay: OverlaySection,
    pub launch: LaunchSection,
    pub http: HttpSection,
}

/// The repository whose branch is deployed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RepoSection {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl Default for RepoSection {
    fn default() -> Self {
        Self {
            owner: "Tennor-modz".into(),
            repo: "Base-bot-V4".into(),
            branch: "main".into(),
        }
    }
}

/// Placement of the cache below the deployment root.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheSection {
    pub base: Vec<String>,
    pub depth: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            base: vec![".npm".into(), "xcache".into()],
            depth: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OverlaySection {
    /// File name, relative to the deployment root and to the tree.
    pub file: String,
}

impl Default for OverlaySection {
    fn default() -> Self {
        Self {
            file: "config.js".into(),
        }
    }
}

/// How the extracted artifact is started.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LaunchSection {
    pub program: String,
    pub entry_point: String,
    pub mode_var: String,
    pub mode_value: String,
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            program: "node".into(),
            entry_point: "index.js".into(),
            mode_var: "NODE_ENV".into(),
            mode_value: "production".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpSection {
    pub port: u16,
    pub metadata_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            port: 3000,
            metadata_timeout_secs: 15,
            download_timeout_secs: 300,
        }
    }
}

/// Config file path: `~/.config/launchpad/launchpad.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("launchpad").join("launchpad.toml"))
}

/// Load config from `explicit` if given, otherwise from the default path.
///
/// An explicit path must exist and parse. The default path is optional:
/// a missing file or one that fails to parse falls back to defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        return toml::from_str(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()));
    }

    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }
        warn!(
            path = %path.display(),
            "failed to parse config, using defaults"
        );
    }

    Ok(AppConfig::default())
}
