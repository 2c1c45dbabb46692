use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Errors that prevent the artifact from starting.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("artifact tree not found at {}", .0.display())]
    TreeMissing(PathBuf),

    #[error("entry point not found at {}", .0.display())]
    EntryPointMissing(PathBuf),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// How a launched process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReport {
    /// The process exited. `code` is `None` when it was killed by a signal.
    Exited { code: Option<i32>, success: bool },
    /// The process could not be waited on.
    WaitFailed(String),
}

/// A running artifact process.
///
/// The child is owned by a background task that reports its exit once;
/// dropping the handle does not stop the process.
#[derive(Debug)]
pub struct LaunchHandle {
    pid: Option<u32>,
    exit: oneshot::Receiver<ExitReport>,
}

impl LaunchHandle {
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Wait for the process to end.
    pub async fn wait(self) -> ExitReport {
        self.exit
            .await
            .unwrap_or_else(|_| ExitReport::WaitFailed("exit watcher ended early".into()))
    }
}

/// Starts the extracted artifact as a child process.
///
/// The child runs `<program> <entry_point>` from inside the tree, shares
/// this process's stdio, and inherits its environment plus any overrides.
#[derive(Debug, Clone)]
pub struct Launcher {
    tree_dir: PathBuf,
    program: String,
    entry_point: String,
    env: Vec<(String, String)>,
}

impl Launcher {
    pub fn new(
        tree_dir: impl Into<PathBuf>,
        program: impl Into<String>,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            tree_dir: tree_dir.into(),
            program: program.into(),
            entry_point: entry_point.into(),
            env: Vec::new(),
        }
    }

    /// Force `key=value` into the child's environment.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn tree_dir(&self) -> &Path {
        &self.tree_dir
    }

    pub fn entry_point(&self) -> PathBuf {
        self.tree_dir.join(&self.entry_point)
    }

    pub async fn launch(&self) -> Result<LaunchHandle, LaunchError> {
        if !is_dir(&self.tree_dir).await {
            return Err(LaunchError::TreeMissing(self.tree_dir.clone()));
        }

        let entry_point = self.entry_point();
        if !is_file(&entry_point).await {
            return Err(LaunchError::EntryPointMissing(entry_point));
        }

        let mut command = Command::new(&self.program);
        command
            .arg(&self.entry_point)
            .current_dir(&self.tree_dir)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = command.spawn().map_err(|source| LaunchError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let pid = child.id();
        info!(
            program = %self.program,
            entry_point = %self.entry_point,
            pid,
            "artifact launched"
        );

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let report = match child.wait().await {
                Ok(status) => ExitReport::Exited {
                    code: status.code(),
                    success: status.success(),
                },
                Err(e) => ExitReport::WaitFailed(e.to_string()),
            };
            debug!(?report, "artifact process ended");
            let _ = tx.send(report);
        });

        Ok(LaunchHandle { pid, exit: rx })
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
