use launchpad::{ResolveError, VersionResolver, VersionTag};
use serde::Deserialize;

use crate::repo::GitHubConfig;

/// Response from GitHub's Commits API.
/// `GET /repos/{owner}/{repo}/commits/{branch}`
#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

/// Resolves the current version of a branch to its head commit SHA.
pub struct CommitClient {
    config: GitHubConfig,
    client: reqwest::Client,
    label: String,
}

impl CommitClient {
    pub fn new(config: GitHubConfig) -> Self {
        let label = config.repo.to_string();
        Self {
            config,
            client: reqwest::Client::new(),
            label,
        }
    }
}

#[async_trait::async_trait]
impl VersionResolver for CommitClient {
    fn label(&self) -> &str {
        &self.label
    }

    async fn resolve(&self) -> Result<VersionTag, ResolveError> {
        let url = self.config.repo_url("commits");

        let response = self
            .config
            .build_request(&self.client, &url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| ResolveError::Network(format!("commit lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ResolveError::Network(format!(
                "commit lookup returned HTTP {}",
                response.status()
            )));
        }

        let commit: CommitResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::Parse(format!("failed to parse commit JSON: {e}")))?;

        VersionTag::new(&commit.sha)
            .ok_or_else(|| ResolveError::Parse("commit response has an empty sha".into()))
    }
}
