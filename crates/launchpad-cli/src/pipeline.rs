use anyhow::{Context, Result};
use launchpad::{ExitReport, LaunchHandle, Overlay, OverlayError, RefreshOutcome};
use tracing::{error, info, warn};

use crate::context::AppContext;

/// Bring the artifact tree up to date and re-apply the local overlay.
///
/// Refresh failures are fatal for this run. Overlay failures are logged and
/// otherwise ignored.
pub async fn prepare(ctx: &AppContext, force: bool) -> Result<RefreshOutcome> {
    let cache = ctx.artifact_cache();
    let outcome = cache
        .ensure_fresh(force)
        .await
        .with_context(|| format!("failed to refresh {}", ctx.repo()))?;

    apply_overlay(&ctx.overlay()).await;

    Ok(outcome)
}

async fn apply_overlay(overlay: &Overlay) {
    match overlay.apply().await {
        Ok(bytes) => info!(dest = %overlay.dest().display(), bytes, "local settings applied"),
        Err(OverlayError::Missing(path)) => {
            warn!(path = %path.display(), "no local settings file found, keeping bundled defaults")
        }
        Err(e) => error!(error = %e, "failed to apply local settings"),
    }
}

/// Start the artifact and log its exit from a background task.
///
/// Returns `false` if the process could not be started at all.
pub async fn launch(ctx: &AppContext) -> bool {
    match ctx.launcher().launch().await {
        Ok(handle) => {
            tokio::spawn(report_exit(handle));
            true
        }
        Err(e) => {
            error!(error = %e, "failed to launch artifact");
            false
        }
    }
}

async fn report_exit(handle: LaunchHandle) {
    let pid = handle.pid();
    match handle.wait().await {
        ExitReport::Exited { code, success: true } => {
            info!(pid, code, "artifact exited")
        }
        ExitReport::Exited { code, .. } => {
            warn!(pid, code, "artifact terminated")
        }
        ExitReport::WaitFailed(reason) => {
            error!(pid, %reason, "lost track of artifact process")
        }
    }
}
