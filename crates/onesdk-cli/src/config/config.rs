//! `AppConfig` struct and TOML read/write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory under `~/.config`.
const CONFIG_DIR: &str = "onesdk";
/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// The One API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// The One API connection settings.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// Bearer token, used when `ONE_API_TOKEN` is not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Base URL override, used when `ONE_API_BASE_URL` is not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Config file location: `{dir}/config.toml` when a directory is given
    /// (`--dir`), else `$HOME/.config/onesdk/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is `None` and `HOME` is not set.
    pub fn resolve_path(dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = dir {
            return Ok(dir.join(CONFIG_FILE));
        }
        let home = std::env::var_os("HOME").context("HOME environment variable is not set")?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR)
            .join(CONFIG_FILE))
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.api.token.is_none());
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn test_resolve_path_uses_dir_override() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();

        // Act
        let path = AppConfig::resolve_path(Some(dir.path())).unwrap();

        // Assert
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE);
    }

    #[test]
    fn test_resolve_path_defaults_under_home() {
        // Arrange & Act
        let path = AppConfig::resolve_path(None).unwrap();

        // Assert
        assert!(path.ends_with(".config/onesdk/config.toml"));
    }

    #[test]
    fn test_token_saved_to_override_dir_is_loaded_back() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join("profile");
        let path = AppConfig::resolve_path(Some(&profile)).unwrap();
        let mut config = AppConfig::load(&path).unwrap();
        config.api.token = Some(String::from("token-from-dir"));

        // Act
        config.save(&path).unwrap();
        let reloaded = AppConfig::load(&AppConfig::resolve_path(Some(&profile)).unwrap()).unwrap();

        // Assert
        assert_eq!(reloaded.api.token.as_deref(), Some("token-from-dir"));
        assert!(profile.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            api: ApiConfig {
                token: Some(String::from("secret")),
                base_url: Some(String::from("http://127.0.0.1:8080/v2/")),
            },
        };

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unset_fields_are_not_written() {
        // Arrange
        let config = AppConfig {
            api: ApiConfig {
                token: Some(String::from("secret")),
                base_url: None,
            },
        };

        // Act
        let toml_str = toml::to_string_pretty(&config).unwrap();

        // Assert
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("token = \"secret\""));
        assert!(!toml_str.contains("base_url"));
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\ntoken = \"abc\"\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.api.token.as_deref(), Some("abc"));
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }
}
