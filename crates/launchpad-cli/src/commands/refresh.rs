use anyhow::Result;
use launchpad::RefreshOutcome;

use crate::context::AppContext;
use crate::pipeline;

/// Run the refresh and overlay steps without launching, and print what
/// happened.
pub async fn run(ctx: &AppContext, force: bool) -> Result<()> {
    let outcome = pipeline::prepare(ctx, force).await?;
    println!("{}", describe(&outcome));
    Ok(())
}

fn describe(outcome: &RefreshOutcome) -> String {
    match outcome {
        RefreshOutcome::UpToDate { version } => format!("Up to date at {version}."),
        RefreshOutcome::Offline { version: Some(version) } => {
            format!("Remote unavailable; keeping cached {version}.")
        }
        RefreshOutcome::Offline { version: None } => {
            "Remote unavailable; keeping cached tree of unknown version.".to_owned()
        }
        RefreshOutcome::Refreshed {
            version: Some(version),
            files,
        } => format!("Installed {version} ({files} files)."),
        RefreshOutcome::Refreshed {
            version: None,
            files,
        } => format!("Installed unversioned snapshot ({files} files)."),
    }
}

#[cfg(test)]
mod tests {
    use launchpad::VersionTag;

    use super::*;

    #[test]
    fn describes_each_outcome() {
        let v = VersionTag::new("abc123").unwrap();

        assert_eq!(
            describe(&RefreshOutcome::UpToDate { version: v.clone() }),
            "Up to date at abc123."
        );
        assert_eq!(
            describe(&RefreshOutcome::Offline {
                version: Some(v.clone())
            }),
            "Remote unavailable; keeping cached abc123."
        );
        assert_eq!(
            describe(&RefreshOutcome::Refreshed {
                version: Some(v),
                files: 12
            }),
            "Installed abc123 (12 files)."
        );
        assert_eq!(
            describe(&RefreshOutcome::Refreshed {
                version: None,
                files: 3
            }),
            "Installed unversioned snapshot (3 files)."
        );
    }
}
