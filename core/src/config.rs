use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    pub database_path: PathBuf,
    /// Budget for one list query, in milliseconds
    pub list_timeout_ms: u64,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("cloudnote.db"),
            list_timeout_ms: 10_000,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl CoreConfig {
    /// Load from a TOML file; a missing file means defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.list_timeout_ms == 0 {
            return Err(ConfigError::Invalid("list_timeout_ms must be positive".to_string()));
        }
        if self.max_page_size == 0 || self.default_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be positive".to_string()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid(
                "default_page_size cannot exceed max_page_size".to_string(),
            ));
        }
        Ok(())
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_millis(self.list_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = CoreConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.list_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloudnote.toml");
        fs::write(&path, "database_path = \"/var/lib/cloudnote/notes.db\"\nlist_timeout_ms = 2500\n")
            .unwrap();

        let config = CoreConfig::load(&path).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/cloudnote/notes.db"));
        assert_eq!(config.list_timeout_ms, 2500);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            CoreConfig::from_toml("default_page_size = 200"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CoreConfig::from_toml("list_timeout_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
