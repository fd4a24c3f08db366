use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use orgmirror::{Config, GitHubClient, SyncEngine};

/// Full success
const EXIT_OK: i32 = 0;
/// Wrong or invalid arguments
const EXIT_USAGE: i32 = 1;
/// Zero repositories discovered
const EXIT_NO_REPOS: i32 = 2;
/// At least one repository failed to sync
const EXIT_SYNC_FAILED: i32 = 3;
/// Unrecoverable error during listing (catch-all)
const EXIT_FATAL: i32 = 255;

#[derive(Parser)]
#[command(name = "orgmirror")]
#[command(about = "Clones and updates (pulls) repositories of a GitHub organization under a local directory")]
#[command(version)]
struct Cli {
    /// GitHub organization name (e.g., NOAA-PMEL)
    orgname: String,

    /// Directory containing the 'private' and 'public' subdirectories that
    /// hold (or will hold) the cloned repositories
    localdir: String,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = parse_args();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            // Fatal listing/transport errors get the full error chain
            eprintln!("{:?}", err);
            process::exit(EXIT_FATAL);
        }
    }
}

/// Parse arguments, remapping clap's usage-error exit code.
///
/// clap exits with 2 on bad arguments, but this tool reserves 2 for "zero
/// repositories discovered"; argument problems exit with 1 instead.
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_OK,
                _ => EXIT_USAGE,
            };
            let _ = err.print();
            process::exit(code);
        }
    }
}

/// Initialize logging on stderr based on verbosity level.
///
/// All diagnostics share stderr so stdout stays clean for schedulers.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    info!("Starting orgmirror v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config)?;

    let localdir = shellexpand::full(&cli.localdir)?.into_owned();

    let client = GitHubClient::new(&config)?;
    let repos = client.list_org_repositories(&cli.orgname).await?;

    if repos.is_empty() {
        warn!("no repositories found for {}", cli.orgname);
        return Ok(EXIT_NO_REPOS);
    }

    let engine = SyncEngine::new(&config, PathBuf::from(localdir));
    let summary = engine.sync_all(&repos).await;

    if summary.all_succeeded() {
        Ok(EXIT_OK)
    } else {
        Ok(EXIT_SYNC_FAILED)
    }
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(&path),
        None => Config::load_or_default(),
    }
}
