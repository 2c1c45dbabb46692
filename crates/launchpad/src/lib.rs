pub mod archive;
pub mod cache;
pub mod launch;
pub mod layout;
pub mod overlay;
pub mod source;
pub mod store;
pub mod version;

pub use archive::{ArchiveError, extract_tarball};
pub use cache::{ArtifactCache, RefreshError, RefreshOutcome};
pub use launch::{ExitReport, LaunchError, LaunchHandle, Launcher};
pub use layout::Layout;
pub use overlay::{Overlay, OverlayError};
pub use source::{ArtifactSource, FetchError, ResolveError, VersionResolver};
pub use store::LocalVersionStore;
pub use version::VersionTag;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
