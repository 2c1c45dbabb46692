use std::time::Duration;

/// An owner/repository/branch triple on GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepoRef {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }

    /// Directory name the extracted tree is installed under, e.g.
    /// `Base-bot-V4-main`.
    pub fn tree_name(&self) -> String {
        format!("{}-{}", self.repo, self.branch)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

/// Shared settings for talking to the GitHub API.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub repo: RepoRef,
    pub token: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout: Duration,
}

impl GitHubConfig {
    pub fn new(repo: RepoRef) -> Self {
        Self {
            repo,
            token: None,
            api_base_url: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_api_base(mut self, api_base_url: Option<String>) -> Self {
        self.api_base_url = api_base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn api_base(&self) -> &str {
        self.api_base_url
            .as_deref()
            .map(|base| base.trim_end_matches('/'))
            .unwrap_or("https://api.github.com")
    }

    pub(crate) fn repo_url(&self, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}/{}",
            self.api_base(),
            self.repo.owner,
            self.repo.repo,
            tail,
            self.repo.branch,
        )
    }

    pub(crate) fn build_request(
        &self,
        client: &reqwest::Client,
        url: &str,
    ) -> reqwest::RequestBuilder {
        let mut req = client
            .get(url)
            .header("User-Agent", "launchpad")
            .timeout(self.timeout);

        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        req
    }
}
