use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as AsyncCommand;
use tracing::debug;

use crate::config::Config;

/// Thin wrapper over the git executable.
///
/// Every invocation gets an explicit working directory; nothing here touches
/// the process-wide current directory. Each command is attempted exactly
/// once, with no retries.
pub struct GitClient {
    quiet: bool,
    timeout: Option<Duration>,
}

impl GitClient {
    /// Create a new Git client with the given configuration
    pub fn new(config: &Config) -> Self {
        Self {
            quiet: config.quiet,
            timeout: config.git_timeout_duration(),
        }
    }

    /// Clone `url` into `parent_dir/dest`.
    ///
    /// `suppress_stderr` silences git's own error output, used for wiki
    /// clone attempts whose failure is expected and ignored.
    pub async fn clone_into(
        &self,
        parent_dir: &Path,
        url: &str,
        dest: &str,
        suppress_stderr: bool,
    ) -> Result<()> {
        let mut args = vec!["clone"];
        if self.quiet {
            args.push("--quiet");
        }
        args.push(url);
        args.push(dest);

        self.run(parent_dir, &args, suppress_stderr).await
    }

    /// Update an existing clone in place
    pub async fn pull(&self, repo_dir: &Path) -> Result<()> {
        let mut args = vec!["pull"];
        if self.quiet {
            args.push("--quiet");
        }

        self.run(repo_dir, &args, false).await
    }

    /// Register a fork's parent as the "upstream" remote
    pub async fn add_upstream_remote(&self, repo_dir: &Path, url: &str) -> Result<()> {
        self.run(repo_dir, &["remote", "add", "upstream", url], false)
            .await
    }

    /// Does this directory hold a git work tree?
    pub fn is_git_repo(dir: &Path) -> bool {
        dir.join(".git").is_dir()
    }

    /// Run one git command, capturing output.
    ///
    /// Without a configured timeout the command may block indefinitely,
    /// and with it the whole run.
    async fn run(&self, cwd: &Path, args: &[&str], suppress_stderr: bool) -> Result<()> {
        debug!("git {} (cwd: {})", args.join(" "), cwd.display());

        let mut command = AsyncCommand::new("git");
        command.args(args).current_dir(cwd).stdin(Stdio::null());
        if suppress_stderr {
            command.stderr(Stdio::null());
        }

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| {
                    anyhow!("git {} timed out after {}s", args.join(" "), limit.as_secs())
                })?,
            None => command.output().await,
        }
        .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }

        Ok(())
    }
}
