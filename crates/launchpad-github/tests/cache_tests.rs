use launchpad::test_support::tarball_with_root;
use launchpad::{ArtifactCache, Layout, Overlay, RefreshOutcome, VersionTag};
use launchpad_github::{CommitClient, GitHubConfig, RepoRef, TarballClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMMITS: &str = "/repos/test-owner/test-repo/commits/main";
const TARBALL: &str = "/repos/test-owner/test-repo/tarball/main";

fn github_cache(
    server: &MockServer,
    root: &std::path::Path,
) -> ArtifactCache<CommitClient, TarballClient> {
    let repo = RepoRef::new("test-owner", "test-repo", "main");
    let layout = Layout::nested(
        root,
        &[".npm".into(), "xcache".into()],
        50,
        repo.tree_name(),
        "config.js",
    );
    let config = GitHubConfig::new(repo).with_api_base(Some(server.uri()));
    ArtifactCache::new(
        layout,
        CommitClient::new(config.clone()),
        TarballClient::new(config),
    )
}

async fn mount_commit(server: &MockServer, sha: &str) {
    Mock::given(method("GET"))
        .and(path(COMMITS))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(r#"{{"sha":"{sha}"}}"#)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fresh_deployment_downloads_and_applies_overlay() {
    let server = MockServer::start().await;
    mount_commit(&server, "abc123").await;
    Mock::given(method("GET"))
        .and(path(TARBALL))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            tarball_with_root(&[("index.js", "bot"), ("config.js", "bundled")]),
            "application/gzip",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("config.js"), "local settings").unwrap();
    let cache = github_cache(&server, root.path());

    let outcome = cache.ensure_fresh(false).await.unwrap();
    assert_eq!(
        outcome,
        RefreshOutcome::Refreshed {
            version: VersionTag::new("abc123"),
            files: 2
        }
    );

    let layout = cache.layout();
    Overlay::new(layout.overlay_source(), layout.overlay_dest())
        .apply()
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(layout.tree_dir().join("config.js")).unwrap(),
        "local settings"
    );
    assert_eq!(
        std::fs::read_to_string(layout.version_file()).unwrap(),
        "abc123"
    );
}

#[tokio::test]
async fn second_run_with_same_sha_skips_download() {
    let server = MockServer::start().await;
    mount_commit(&server, "abc123").await;
    Mock::given(method("GET"))
        .and(path(TARBALL))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(tarball_with_root(&[("index.js", "bot")]), "application/gzip"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let cache = github_cache(&server, root.path());

    cache.ensure_fresh(false).await.unwrap();
    let second = cache.ensure_fresh(false).await.unwrap();

    assert!(matches!(second, RefreshOutcome::UpToDate { .. }));
}

#[tokio::test]
async fn commit_lookup_failure_reuses_existing_tree() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COMMITS))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TARBALL))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let cache = github_cache(&server, root.path());
    let tree = cache.layout().tree_dir();
    std::fs::create_dir_all(&tree).unwrap();
    std::fs::write(tree.join("index.js"), "cached bot").unwrap();
    cache
        .store()
        .write(&VersionTag::new("abc123").unwrap())
        .await
        .unwrap();

    let outcome = cache.ensure_fresh(false).await.unwrap();

    assert_eq!(
        outcome,
        RefreshOutcome::Offline {
            version: VersionTag::new("abc123")
        }
    );
    assert_eq!(
        std::fs::read_to_string(tree.join("index.js")).unwrap(),
        "cached bot"
    );
}

#[tokio::test]
async fn failed_download_is_fatal_on_empty_cache() {
    let server = MockServer::start().await;
    mount_commit(&server, "abc123").await;
    Mock::given(method("GET"))
        .and(path(TARBALL))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let cache = github_cache(&server, root.path());

    assert!(cache.ensure_fresh(false).await.is_err());
    assert!(!cache.layout().version_file().exists());
    assert!(!cache.layout().tree_dir().exists());
}
