/**
 * config.rs
 * Parser for relnotes configuration files (YAML format)
 *
 * Format:
 * ```yaml
 * repository: /srv/relnotes/repo
 * cacheDir: /var/cache/relnotes      # optional, default ~/.config/relnotes/cache
 * defaultLanguage: de_DE             # optional, default en_US
 * defaultFormat: txt                 # optional, default txt
 * ```
 *
 * Default location: ~/.config/relnotes/config.yaml
 * RELNOTES_LANG overrides defaultLanguage when set.
 */

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::DocumentFormat;
use crate::errors::{RelNotesError, Result};
use crate::store::FileStore;
use crate::DEFAULT_LANGUAGE;

/// Environment variable overriding the configured default language
pub const LANG_ENV: &str = "RELNOTES_LANG";

/// relnotes configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RelNotesConfig {
    /// Local package repository directory
    pub repository: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_format: Option<DocumentFormat>,
}

impl RelNotesConfig {
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        RelNotesConfig {
            repository: repository.into(),
            cache_dir: None,
            default_language: None,
            default_format: None,
        }
    }

    /// Default config path: ~/.config/relnotes/config.yaml
    pub fn default_path() -> Result<PathBuf> {
        let home_dir = env::var("HOME").map_err(|_| {
            RelNotesError::Config("HOME environment variable not set".to_string())
        })?;

        Ok(PathBuf::from(home_dir)
            .join(".config")
            .join("relnotes")
            .join("config.yaml"))
    }

    /// Load configuration from specified path
    ///
    /// # Arguments
    /// * `path` - Path to config.yaml
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RelNotesError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let config: RelNotesConfig = serde_yaml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Ensures the repository path and language are usable
    pub fn validate(&self) -> Result<()> {
        if self.repository.as_os_str().is_empty() {
            return Err(RelNotesError::Config("repository cannot be empty".to_string()));
        }

        if let Some(language) = &self.default_language {
            if language.trim().is_empty() {
                return Err(RelNotesError::Config(
                    "defaultLanguage cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Cache directory, falling back to the file store default
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStore::default_dir(),
        }
    }

    /// Default language, honoring RELNOTES_LANG
    pub fn language(&self) -> String {
        self.language_from(env::var(LANG_ENV).ok())
    }

    fn language_from(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.default_language.clone())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    pub fn format(&self) -> DocumentFormat {
        self.default_format.clone().unwrap_or_default()
    }
}
