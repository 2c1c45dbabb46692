use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::context::AppContext;
use crate::{pipeline, status};

/// Serve the status page, bring the artifact up to date, launch it, then
/// keep serving until interrupted.
///
/// A refresh failure returns an error before anything is launched. A
/// launch failure is logged and the status page stays up.
pub async fn run(ctx: &AppContext, force: bool) -> Result<()> {
    let port = ctx.config.http.port;
    let listener = status::bind(port)
        .await
        .with_context(|| format!("failed to bind status server on port {port}"))?;
    info!(port, "status server listening");

    let server = tokio::spawn(status::serve(listener, ctx.started(), shutdown_signal()));

    pipeline::prepare(ctx, force).await?;
    if !pipeline::launch(ctx).await {
        warn!(port, "artifact is not running; serving status page only");
    }

    server
        .await
        .context("status server task panicked")?
        .context("status server failed")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    } else {
        // No signal handler available; serve until killed.
        std::future::pending::<()>().await;
    }
}
