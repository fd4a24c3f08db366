//! Repository syncer
//!
//! Takes the descriptors produced by the lister and makes the local tree
//! match: clone what is missing, pull what exists, and keep companion wikis
//! in step. Strictly sequential; one descriptor is fully processed before
//! the next begins.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::git::GitClient;
use crate::github::RepoDescriptor;

/// Results from a complete sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub total: usize,
    pub failed: usize,
}

impl SyncSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Clones and updates local copies of repositories under a fixed root.
///
/// The root must already contain `private/` and `public/` subdirectories;
/// clones land in one or the other depending on repository visibility.
pub struct SyncEngine {
    local_root: PathBuf,
    git: GitClient,
}

impl SyncEngine {
    /// Create a new sync engine rooted at `local_root`
    pub fn new(config: &Config, local_root: PathBuf) -> Self {
        Self {
            local_root,
            git: GitClient::new(config),
        }
    }

    /// Sync every descriptor in order and report how many failed
    pub async fn sync_all(&self, repos: &[RepoDescriptor]) -> SyncSummary {
        let mut failed = 0;

        for repo in repos {
            if !self.sync_repo(repo).await {
                failed += 1;
            }
        }

        let summary = SyncSummary {
            total: repos.len(),
            failed,
        };

        info!(
            "Synchronized {} repositories, {} failed",
            summary.total, summary.failed
        );
        summary
    }

    /// Create or update the local clone of one repository, wiki included.
    ///
    /// Expected failure modes (failed clone or pull, invalid local state)
    /// are reported with a diagnostic and yield `false`; they never abort
    /// the run. The only swallowed failure is the wiki clone attempt, since
    /// the wiki flag does not guarantee any wiki content exists.
    pub async fn sync_repo(&self, repo: &RepoDescriptor) -> bool {
        let basedir = self
            .local_root
            .join(if repo.private { "private" } else { "public" });
        let clonedir = basedir.join(&repo.name);

        if !clonedir.exists() {
            // SSH protocol for private repositories
            let url = if repo.private {
                &repo.ssh_url
            } else {
                &repo.clone_url
            };

            if let Err(err) = self.git.clone_into(&basedir, url, &repo.name, false).await {
                warn!("cannot clone repository {} : {} : {:#}", repo.name, url, err);
                return false;
            }

            if !repo.parent_url.is_empty() {
                if let Err(err) = self
                    .git
                    .add_upstream_remote(&clonedir, &repo.parent_url)
                    .await
                {
                    warn!(
                        "cannot add to {} the upstream {} : {:#}",
                        repo.name, repo.parent_url, err
                    );
                    return false;
                }
            }
        } else if clonedir.is_dir() {
            if GitClient::is_git_repo(&clonedir) {
                if let Err(err) = self.git.pull(&clonedir).await {
                    warn!("cannot update (pull) repository {} : {:#}", repo.name, err);
                    return false;
                }
            } else {
                warn!("not a git repository: {}", clonedir.display());
                return false;
            }
        } else {
            warn!("not a directory: {}", clonedir.display());
            return false;
        }

        if repo.has_wiki {
            self.sync_wiki(repo, &basedir).await
        } else {
            true
        }
    }

    /// Sync the companion wiki of a wiki-capable repository.
    ///
    /// A failed clone of an absent wiki is ignored: the wiki flag only means
    /// a wiki is allowed, not that one has content. A failed pull of an
    /// existing wiki clone is a real failure.
    async fn sync_wiki(&self, repo: &RepoDescriptor, basedir: &Path) -> bool {
        let wikiname = format!("{}.wiki", repo.name);
        let wikidir = basedir.join(&wikiname);

        if !wikidir.exists() {
            let wikiurl = wiki_url(&repo.ssh_url);
            if let Err(err) = self.git.clone_into(basedir, &wikiurl, &wikiname, true).await {
                debug!("ignoring failed wiki clone for {} : {:#}", repo.name, err);
            }
            true
        } else if wikidir.is_dir() {
            if GitClient::is_git_repo(&wikidir) {
                if let Err(err) = self.git.pull(&wikidir).await {
                    warn!("cannot update (pull) wiki {} : {:#}", wikiname, err);
                    return false;
                }
                true
            } else {
                warn!("not a git repository: {}", wikidir.display());
                false
            }
        } else {
            warn!("not a directory: {}", wikidir.display());
            false
        }
    }
}

/// Derive the wiki clone URL from a repository SSH URL
fn wiki_url(ssh_url: &str) -> String {
    format!("{}.wiki.git", ssh_url.strip_suffix(".git").unwrap_or(ssh_url))
}
