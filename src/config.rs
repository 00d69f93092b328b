//! User settings read from `settings.toml` in the platform config directory.
//!
//! Every field is optional. Command-line flags take precedence over the file,
//! and the file takes precedence over the built-in defaults.

use crate::error::{Error, Result};
use crate::NO_TRANSLATION;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "tamildict";
const STORE_FILE: &str = "translations.txt";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// `translations.txt` in the user's downloads folder.
pub fn default_store_path() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STORE_FILE)
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| Error::Config {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Falls back to defaults when the file is absent or unreadable.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => path,
            None => return Self::default(),
        };
        if !path.exists() {
            return Self::default();
        }

        Self::load_from_path(&path).unwrap_or_else(|e| {
            warn!("{}; using default settings", e);
            Self::default()
        })
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(default_store_path)
    }

    pub fn placeholder(&self) -> &str {
        self.placeholder.as_deref().unwrap_or(NO_TRANSLATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_from_path_reads_all_fields() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(
            &config_path,
            "store_path = \"/data/words.txt\"\nplaceholder = \"???\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_path).expect("failed to load config");
        assert_eq!(config.store_path(), PathBuf::from("/data/words.txt"));
        assert_eq!(config.placeholder(), "???");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "").unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.placeholder(), NO_TRANSLATION);
        assert!(config.store_path().ends_with("translations.txt"));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").unwrap();

        let err = Config::load_from_path(&config_path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn load_or_default_tolerates_missing_and_invalid_files() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert_eq!(Config::load_or_default(Some(&missing)), Config::default());

        let invalid = temp_dir.path().join("invalid.toml");
        fs::write(&invalid, "placeholder = [").unwrap();
        assert_eq!(Config::load_or_default(Some(&invalid)), Config::default());
    }
}
