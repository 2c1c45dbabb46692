mod commands;
mod config;
mod context;
mod pipeline;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Fetch, cache, and launch a GitHub-hosted application bundle")]
struct Cli {
    /// Path to a launchpad.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Status server port
    #[arg(long, env = "PORT", global = true)]
    port: Option<u16>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh the bundle, launch it, and serve the status page (default)
    Run {
        /// Re-download even if the cached version is current
        #[arg(long)]
        force: bool,
    },
    /// Refresh the bundle and apply local settings without launching
    Refresh {
        /// Re-download even if the cached version is current
        #[arg(long)]
        force: bool,
    },
    /// Show where the cache, tree, and overlay live
    Paths,
}

fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "launchpad=info,warn",
        1 => "launchpad=debug,info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut app_config = config::load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        app_config.http.port = port;
    }
    let ctx = AppContext::new(app_config, github_token())?;

    match cli.command.unwrap_or(Command::Run { force: false }) {
        Command::Run { force } => commands::run::run(&ctx, force).await,
        Command::Refresh { force } => commands::refresh::run(&ctx, force).await,
        Command::Paths => {
            commands::paths::run(&ctx);
            Ok(())
        }
    }
}
