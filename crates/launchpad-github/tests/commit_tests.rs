use launchpad::{ResolveError, VersionResolver};
use launchpad_github::{CommitClient, GitHubConfig, RepoRef};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> CommitClient {
    let config = GitHubConfig::new(RepoRef::new("test-owner", "test-repo", "main"))
        .with_api_base(Some(server.uri()))
        .with_token(token.map(str::to_owned));
    CommitClient::new(config)
}

#[tokio::test]
async fn resolves_head_sha() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/test-owner/test-repo/commits/main"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"sha":"abc123","commit":{"message":"initial"},"html_url":"https://example"}"#,
        ))
        .mount(&server)
        .await;

    let version = client_for(&server, None).resolve().await.unwrap();
    assert_eq!(version.as_str(), "abc123");
}

#[tokio::test]
async fn sends_user_agent_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/test-owner/test-repo/commits/main"))
        .and(header("User-Agent", "launchpad"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"sha":"abc123"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let version = client_for(&server, Some("secret")).resolve().await.unwrap();
    assert_eq!(version.as_str(), "abc123");
}

#[tokio::test]
async fn http_error_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/test-owner/test-repo/commits/main"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client_for(&server, None).resolve().await;
    assert!(matches!(result, Err(ResolveError::Network(_))));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/test-owner/test-repo/commits/main"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"no sha"}"#))
        .mount(&server)
        .await;

    let result = client_for(&server, None).resolve().await;
    assert!(matches!(result, Err(ResolveError::Parse(_))));
}

#[tokio::test]
async fn empty_sha_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/test-owner/test-repo/commits/main"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"sha":"  "}"#))
        .mount(&server)
        .await;

    let result = client_for(&server, None).resolve().await;
    assert!(matches!(result, Err(ResolveError::Parse(_))));
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let config = GitHubConfig::new(RepoRef::new("test-owner", "test-repo", "main"))
        .with_api_base(Some("http://127.0.0.1:1".into()));

    let result = CommitClient::new(config).resolve().await;
    assert!(matches!(result, Err(ResolveError::Network(_))));
}

#[tokio::test]
async fn label_names_the_branch() {
    let config = GitHubConfig::new(RepoRef::new("test-owner", "test-repo", "main"));
    assert_eq!(CommitClient::new(config).label(), "test-owner/test-repo@main");
}
