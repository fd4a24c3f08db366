use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for orgmirror
///
/// Everything here has a sensible default; a config file is only needed to
/// point at a different hosting instance or to loosen/tighten the name rules.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Regular expression that acceptable repository names must match in full
    #[serde(default = "default_name_regex")]
    pub name_regex: String,

    /// Root URL of the hosting API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// SSH host prefix expected in repository SSH URLs
    #[serde(default = "default_ssh_host")]
    pub ssh_host: String,

    /// Name of the environment variable holding the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Pass --quiet to git clone/pull
    #[serde(default = "default_true")]
    pub quiet: bool,

    /// Optional timeout for each git invocation, in seconds.
    /// Unset means git commands may block indefinitely.
    #[serde(default)]
    pub git_timeout: Option<u64>,
}

// Default value functions
fn default_name_regex() -> String {
    r"[\w.-]+".to_string()
}
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_ssh_host() -> String {
    "git@github.com".to_string()
}
fn default_token_env() -> String {
    "GITUSERTOKEN".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name_regex: default_name_regex(),
            api_base: default_api_base(),
            ssh_host: default_ssh_host(),
            token_env: default_token_env(),
            quiet: default_true(),
            git_timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location or create a default config
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            let config = Self::default();

            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }

            config.save(&config_path)?;

            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("orgmirror").join("config.yml"))
    }

    /// Git timeout as a std Duration, if configured
    pub fn git_timeout_duration(&self) -> Option<std::time::Duration> {
        self.git_timeout.map(std::time::Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();

        assert_eq!(config.name_regex, r"[\w.-]+");
        assert_eq!(config.api_base, "https://api.github.com");
        assert_eq!(config.ssh_host, "git@github.com");
        assert_eq!(config.token_env, "GITUSERTOKEN");
        assert!(config.quiet);
        assert!(config.git_timeout.is_none());
    }

    #[test]
    fn test_config_load_nonexistent_file() {
        let nonexistent_path = Path::new("/nonexistent/path/config.yml");
        let result = Config::load(nonexistent_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.yml");

        let config = Config {
            name_regex: r"[a-z-]+".to_string(),
            api_base: "https://git.example.com/api/v3".to_string(),
            ssh_host: "git@git.example.com".to_string(),
            token_env: "EXAMPLE_TOKEN".to_string(),
            quiet: false,
            git_timeout: Some(120),
        };

        config.save(&config_path).expect("Failed to save config");

        let loaded_config = Config::load(&config_path).expect("Failed to load config");

        assert_eq!(loaded_config.name_regex, r"[a-z-]+");
        assert_eq!(loaded_config.api_base, "https://git.example.com/api/v3");
        assert_eq!(loaded_config.ssh_host, "git@git.example.com");
        assert_eq!(loaded_config.token_env, "EXAMPLE_TOKEN");
        assert!(!loaded_config.quiet);
        assert_eq!(loaded_config.git_timeout, Some(120));
    }

    #[test]
    fn test_config_default_path_xdg() {
        let default_path = Config::default_config_path().expect("Failed to get default path");
        assert!(default_path.to_string_lossy().contains("orgmirror"));
        assert!(default_path.to_string_lossy().ends_with("config.yml"));
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml_content = r#"
name_regex: "[a-z0-9-]+"
api_base: "https://api.github.com"
token_env: "GITHUB_TOKEN"
quiet: false
git_timeout: 300
"#;

        let config: Config = serde_yaml::from_str(yaml_content).expect("Failed to parse YAML");

        assert_eq!(config.name_regex, "[a-z0-9-]+");
        assert_eq!(config.token_env, "GITHUB_TOKEN");
        assert!(!config.quiet);
        assert_eq!(config.git_timeout, Some(300));
        // Omitted fields fall back to defaults
        assert_eq!(config.ssh_host, "git@github.com");
    }

    #[test]
    fn test_yaml_parsing_empty_document() {
        let config: Config = serde_yaml::from_str("{}").expect("Failed to parse YAML");
        assert_eq!(config.name_regex, r"[\w.-]+");
        assert!(config.git_timeout.is_none());
    }

    #[test]
    fn test_git_timeout_duration() {
        let mut config = Config::default();
        assert!(config.git_timeout_duration().is_none());

        config.git_timeout = Some(90);
        assert_eq!(
            config.git_timeout_duration(),
            Some(std::time::Duration::from_secs(90))
        );
    }
}
