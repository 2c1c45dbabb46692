use std::path::Path;

use futures::StreamExt;
use launchpad::{ArtifactSource, FetchError};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::repo::GitHubConfig;

/// Downloads a branch tarball from GitHub.
///
/// The body is streamed straight to disk rather than buffered, so large
/// repositories never sit in memory.
pub struct TarballClient {
    config: GitHubConfig,
    client: reqwest::Client,
    label: String,
}

impl TarballClient {
    pub fn new(config: GitHubConfig) -> Self {
        let label = config.repo.to_string();
        Self {
            config,
            client: reqwest::Client::new(),
            label,
        }
    }

    fn tarball_url(&self) -> String {
        self.config.repo_url("tarball")
    }
}

#[async_trait::async_trait]
impl ArtifactSource for TarballClient {
    fn label(&self) -> &str {
        &self.label
    }

    async fn download(&self, dest: &Path) -> Result<u64, FetchError> {
        let url = self.tarball_url();
        debug!(%url, "requesting tarball");

        let response = self
            .config
            .build_request(&self.client, &url)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("tarball download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Network(format!(
                "tarball download returned HTTP {}",
                response.status()
            )));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| FetchError::Network(format!("failed to read tarball body: {e}")))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(written)
    }
}
