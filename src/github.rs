use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::env;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Everything the syncer needs to know about one repository.
///
/// Produced by [`GitHubClient::list_org_repositories`] in page order, then
/// in-page order. Entries that fail name or URL validation never become
/// descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDescriptor {
    /// Repository name, e.g. "PyFerret"
    pub name: String,
    /// Is this a private repository?
    pub private: bool,
    /// Whether a companion wiki may exist (flag only, not a content guarantee)
    pub has_wiki: bool,
    /// SSH clone URL, e.g. "git@github.com:NOAA-PMEL/PyFerret.git"
    pub ssh_url: String,
    /// HTTPS clone URL, e.g. "https://github.com/NOAA-PMEL/PyFerret.git"
    pub clone_url: String,
    /// SSH URL of the fork parent, or empty if this is not a fork
    pub parent_url: String,
}

/// One entry of the paginated organization repository listing.
///
/// Validated at the API boundary: a listing entry missing any of these
/// fields is a parse error for the whole run, not a skipped entry.
#[derive(Debug, Deserialize)]
struct RepoEntry {
    name: String,
    private: bool,
    has_wiki: bool,
    fork: bool,
    ssh_url: String,
    clone_url: String,
}

/// Per-repository detail response, fetched only to resolve fork parentage.
#[derive(Debug, Deserialize)]
struct RepoDetail {
    parent: Option<RepoParent>,
}

#[derive(Debug, Deserialize)]
struct RepoParent {
    ssh_url: String,
}

/// GitHub API client that enumerates and validates organization repositories
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    ssh_host: String,
    name_regex: Regex,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a new client from the configuration.
    ///
    /// The access token is taken from the environment variable named by
    /// `config.token_env`; absent or blank means unauthenticated requests,
    /// which limits the listing to public repositories.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        // Anchored so the name must match in full
        let name_regex = Regex::new(&format!("^(?:{})$", config.name_regex))
            .with_context(|| format!("Invalid repository name regex: {}", config.name_regex))?;

        let token = env::var(&config.token_env)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        if token.is_some() {
            debug!("Using access token from {}", config.token_env);
        } else {
            debug!(
                "No access token in {}, only public repositories will be visible",
                config.token_env
            );
        }

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            ssh_host: config.ssh_host.clone(),
            name_regex,
            token,
        })
    }

    /// Whether requests will be authenticated
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// List all acceptable repositories of an organization.
    ///
    /// Pages through the listing starting at page 1 and stops at the first
    /// empty page. There is deliberately no page cap: an API that never
    /// returns an empty page will loop forever, matching the upstream
    /// pagination contract.
    ///
    /// Entries failing validation are skipped with a diagnostic. Transport
    /// or parse failures, including a failed fork-parent lookup, abort the
    /// listing.
    pub async fn list_org_repositories(&self, org: &str) -> Result<Vec<RepoDescriptor>> {
        debug!("Fetching repositories for organization: {}", org);

        let mut repos = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = format!("{}/orgs/{}/repos?page={}", self.api_base, org, page);
            let entries: Vec<RepoEntry> = self
                .get_json(&url)
                .await
                .with_context(|| format!("Failed to fetch repositories for {} page {}", org, page))?;

            if entries.is_empty() {
                break;
            }

            for entry in entries {
                if let Some(descriptor) = self.validate_entry(org, entry).await? {
                    repos.push(descriptor);
                }
            }

            page += 1;
        }

        info!("Found {} repositories for organization: {}", repos.len(), org);
        Ok(repos)
    }

    /// Validate one listing entry and resolve its fork parent.
    ///
    /// Returns `Ok(None)` for entries excluded by the name/URL filter;
    /// a failed parent lookup is an error, never a silent non-fork.
    async fn validate_entry(&self, org: &str, entry: RepoEntry) -> Result<Option<RepoDescriptor>> {
        if !self.name_regex.is_match(&entry.name) {
            warn!("repo ignored (no match) {} : {}", entry.name, entry.ssh_url);
            return Ok(None);
        }

        let expected = self.expected_ssh_url(org, &entry.name);
        if entry.ssh_url != expected {
            warn!("repo ignored (mismatch) {} : {}", entry.name, entry.ssh_url);
            return Ok(None);
        }

        let parent_url = if entry.fork {
            self.fetch_parent_url(org, &entry.name).await?
        } else {
            String::new()
        };

        Ok(Some(RepoDescriptor {
            name: entry.name,
            private: entry.private,
            has_wiki: entry.has_wiki,
            ssh_url: entry.ssh_url,
            clone_url: entry.clone_url,
            parent_url,
        }))
    }

    /// Fetch the SSH URL of a fork's parent repository
    async fn fetch_parent_url(&self, org: &str, name: &str) -> Result<String> {
        let url = format!("{}/repos/{}/{}", self.api_base, org, name);
        let detail: RepoDetail = self
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to fetch fork parent for {}/{}", org, name))?;

        let parent = detail
            .parent
            .ok_or_else(|| anyhow!("Repository {}/{} is flagged as a fork but has no parent", org, name))?;

        Ok(parent.ssh_url)
    }

    /// The SSH URL the API must report for this organization and name
    fn expected_ssh_url(&self, org: &str, name: &str) -> String {
        format!("{}:{}/{}.git", self.ssh_host, org, name)
    }

    /// Issue one authenticated GET and decode the JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {}", token));
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("Request rejected: {}", url))?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }
}
