use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

use std::future::Future;
use std::path::{Path, PathBuf};

/// Credentials and paths needed for a conversion run.
///
/// Every key can also be supplied through a `QUIRE_*` environment variable,
/// which takes precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Notion integration token.
    #[serde(alias = "notionAPIKey")]
    pub notion_api_key: Option<String>,
    /// GitHub token with the `gist` scope.
    #[serde(alias = "githubPAT")]
    pub github_token: Option<String>,
    /// Title of the Notion database holding the articles.
    #[serde(alias = "databaseName")]
    pub database_name: Option<String>,
    /// Directory the draft is written into.
    #[serde(alias = "contentPath")]
    pub content_path: Option<PathBuf>,
    /// Optional minijinja template replacing the built-in draft layout.
    pub draft_template: Option<PathBuf>,
    /// Override for the Notion API base URL.
    pub notion_base_url: Option<String>,
    /// Override for the GitHub API base URL.
    pub github_base_url: Option<String>,
}

/// Everything required is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub notion_api_key: String,
    pub github_token: String,
    pub database_name: String,
    pub content_path: PathBuf,
    pub draft_template: Option<PathBuf>,
    pub notion_base_url: Option<String>,
    pub github_base_url: Option<String>,
}

impl Config {
    /// Loads the configuration from the provided loader.
    pub async fn load(loader: &impl Loader) -> Result<Self, ConfigError> {
        loader.load().await
    }

    /// Overlay `QUIRE_*` variables read through `var`
    pub fn merge_env_with(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let set = |slot: &mut Option<String>, key: &str| {
            if let Some(value) = var(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        };
        set(&mut self.notion_api_key, "QUIRE_NOTION_API_KEY");
        set(&mut self.github_token, "QUIRE_GITHUB_TOKEN");
        set(&mut self.database_name, "QUIRE_DATABASE_NAME");
        set(&mut self.notion_base_url, "QUIRE_NOTION_BASE_URL");
        set(&mut self.github_base_url, "QUIRE_GITHUB_BASE_URL");
        if let Some(path) = var("QUIRE_CONTENT_PATH").filter(|v| !v.is_empty()) {
            self.content_path = Some(PathBuf::from(path));
        }
        if let Some(path) = var("QUIRE_DRAFT_TEMPLATE").filter(|v| !v.is_empty()) {
            self.draft_template = Some(PathBuf::from(path));
        }
        self
    }

    /// Overlay `QUIRE_*` variables from the process environment
    pub fn merge_env(self) -> Self {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Check that every required key is set
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        fn required<T>(
            value: Option<T>,
            key: &'static str,
            env: &'static str,
        ) -> Result<T, ConfigError> {
            value.ok_or(ConfigError::MissingKey { key, env })
        }

        Ok(ResolvedConfig {
            notion_api_key: required(
                self.notion_api_key,
                "notion_api_key",
                "QUIRE_NOTION_API_KEY",
            )?,
            github_token: required(self.github_token, "github_token", "QUIRE_GITHUB_TOKEN")?,
            database_name: required(self.database_name, "database_name", "QUIRE_DATABASE_NAME")?,
            content_path: required(self.content_path, "content_path", "QUIRE_CONTENT_PATH")?,
            draft_template: self.draft_template,
            notion_base_url: self.notion_base_url,
            github_base_url: self.github_base_url,
        })
    }
}

/// The trait for loading configuration data.
pub trait Loader {
    /// Loads the configuration data.
    fn load(&self) -> impl Future<Output = Result<Config, ConfigError>> + Send;
}

/// An implementation of [`Loader`] that reads a configuration file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a new [`FileStore`] with the given path.
    ///
    /// [`Config`] data will be deserialized according to the file extension:
    /// `.json`, `.toml`, `.yml` and `.yaml` are supported.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn parse_error(&self, source: impl std::error::Error + Send + Sync + 'static) -> ConfigError {
        ConfigError::Parse {
            path: self.path.clone(),
            source: Box::new(source),
        }
    }
}

impl Loader for FileStore {
    async fn load(&self) -> Result<Config, ConfigError> {
        let format = self.path.extension().and_then(|ext| ext.to_str());
        if !matches!(format, Some("json" | "toml" | "yml" | "yaml")) {
            return Err(ConfigError::UnsupportedFormat {
                path: self.path.clone(),
            });
        }

        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })?;

        match format {
            Some("json") => serde_json::from_str(&contents).map_err(|e| self.parse_error(e)),
            Some("toml") => toml::from_str(&contents).map_err(|e| self.parse_error(e)),
            _ => serde_yaml::from_str(&contents).map_err(|e| self.parse_error(e)),
        }
    }
}
