pub mod commit;
pub mod repo;
pub mod tarball;

pub use commit::CommitClient;
pub use repo::{GitHubConfig, RepoRef};
pub use tarball::TarballClient;
