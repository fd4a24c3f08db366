//! orgmirror - Batch mirror of a GitHub organization
//!
//! orgmirror clones and updates (pulls) every accessible repository of a
//! GitHub organization, wikis included, under a local directory tree split
//! into `private/` and `public/` subdirectories.
//!
//! ## Core Behavior
//!
//! - **Discovery**: paginated GitHub API enumeration with per-entry name
//!   and SSH URL validation, plus fork-parent resolution
//! - **Synchronization**: sequential clone-or-pull per repository, with an
//!   `upstream` remote registered on freshly cloned forks
//! - **Authentication**: optional access token from the environment, making
//!   private repositories visible
//!
//! ## Modules
//!
//! - [`config`]: Configuration management and parsing
//! - [`github`]: Repository listing and validation against the hosting API
//! - [`git`]: Wrapper over the git executable
//! - [`sync`]: Per-repository clone/pull/wiki orchestration

pub mod config;
pub mod git;
pub mod github;
pub mod sync;

pub use config::Config;
pub use git::GitClient;
pub use github::{GitHubClient, RepoDescriptor};
pub use sync::{SyncEngine, SyncSummary};
