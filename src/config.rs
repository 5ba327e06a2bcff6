use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::catalog::loader::DEFAULT_CATALOG_PATHS;
use crate::content::Language;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Local directory serving `content/` and `patterns.json`.
    #[serde(default = "default_site_root")]
    pub site_root: String,
    /// Remote site to browse instead of `site_root`, when set.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_catalog_paths")]
    pub catalog_paths: Vec<String>,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_language() -> String {
    Language::default().to_key().to_string()
}
fn default_site_root() -> String {
    ".".to_string()
}
fn default_catalog_paths() -> Vec<String> {
    DEFAULT_CATALOG_PATHS.iter().map(|p| p.to_string()).collect()
}
fn default_log_file() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("patternbook")
        .join("patternbook.log")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            default_language: default_language(),
            site_root: default_site_root(),
            base_url: None,
            catalog_paths: default_catalog_paths(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("patternbook")
            .join("config.toml")
    }

    /// Canonicalize `default_language`, resetting unknown keys to `cpp`.
    /// An empty `catalog_paths` list falls back to the built-in candidates.
    pub fn normalize(&mut self) {
        self.default_language = self.language().to_key().to_string();
        if self.catalog_paths.is_empty() {
            self.catalog_paths = default_catalog_paths();
        }
    }

    pub fn language(&self) -> Language {
        Language::from_key(&self.default_language).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.default_language, "cpp");
        assert_eq!(config.site_root, ".");
        assert_eq!(config.base_url, None);
        assert_eq!(config.catalog_paths.len(), 4);
        assert_eq!(config.catalog_paths[0], "content/patterns.json");
        assert!(config.log_file.ends_with("patternbook.log"));
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
theme = "gruvbox-dark"
base_url = "https://patterns.example.com/"
catalog_paths = ["data/patterns.json"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "gruvbox-dark");
        assert_eq!(
            config.base_url.as_deref(),
            Some("https://patterns.example.com/")
        );
        assert_eq!(config.catalog_paths, vec!["data/patterns.json"]);
        assert_eq!(config.default_language, "cpp");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.catalog_paths, deserialized.catalog_paths);
        assert_eq!(config.log_file, deserialized.log_file);
    }

    #[test]
    fn test_normalize_language_label_canonicalized() {
        let mut config = Config::default();
        config.default_language = "JavaScript".to_string();
        config.normalize();
        assert_eq!(config.default_language, "javascript");
        assert_eq!(config.language(), Language::JavaScript);
    }

    #[test]
    fn test_normalize_language_invalid_key_resets() {
        let mut config = Config::default();
        config.default_language = "haskell".to_string();
        config.normalize();
        assert_eq!(config.default_language, "cpp");
    }

    #[test]
    fn test_normalize_empty_catalog_paths_restored() {
        let mut config = Config::default();
        config.catalog_paths.clear();
        config.normalize();
        assert_eq!(config.catalog_paths, default_catalog_paths());
    }
}
