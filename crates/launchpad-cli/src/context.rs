use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use launchpad::{ArtifactCache, Launcher, Layout, Overlay};
use launchpad_github::{CommitClient, GitHubConfig, RepoRef, TarballClient};

use crate::config::AppConfig;

/// Everything the pipeline and the status server need, built once in `main`.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub layout: Layout,
    token: Option<String>,
    started: Instant,
}

impl AppContext {
    pub fn new(config: AppConfig, token: Option<String>) -> Result<Self> {
        let root = match &config.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("could not determine current directory")?,
        };
        Ok(Self::with_root(config, root, token))
    }

    pub fn with_root(config: AppConfig, root: PathBuf, token: Option<String>) -> Self {
        let repo = repo_ref(&config);
        let layout = Layout::nested(
            root,
            &config.cache.base,
            config.cache.depth,
            repo.tree_name(),
            &config.overlay.file,
        );
        Self {
            config,
            layout,
            token,
            started: Instant::now(),
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn repo(&self) -> RepoRef {
        repo_ref(&self.config)
    }

    fn github(&self, timeout_secs: u64) -> GitHubConfig {
        GitHubConfig::new(self.repo())
            .with_token(self.token.clone())
            .with_api_base(self.config.api_base_url.clone())
            .with_timeout(Duration::from_secs(timeout_secs))
    }

    pub fn artifact_cache(&self) -> ArtifactCache<CommitClient, TarballClient> {
        let http = &self.config.http;
        ArtifactCache::new(
            self.layout.clone(),
            CommitClient::new(self.github(http.metadata_timeout_secs)),
            TarballClient::new(self.github(http.download_timeout_secs)),
        )
    }

    pub fn overlay(&self) -> Overlay {
        Overlay::new(self.layout.overlay_source(), self.layout.overlay_dest())
    }

    pub fn launcher(&self) -> Launcher {
        let launch = &self.config.launch;
        Launcher::new(
            self.layout.tree_dir(),
            &launch.program,
            &launch.entry_point,
        )
        .with_env(&launch.mode_var, &launch.mode_value)
    }
}

fn repo_ref(config: &AppConfig) -> RepoRef {
    RepoRef::new(&config.repo.owner, &config.repo.repo, &config.repo.branch)
}
