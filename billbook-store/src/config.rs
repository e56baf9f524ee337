//! Configuration management.

use billbook_fetch::{ClientSettings, RetryPolicy, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::StoreError;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API connection settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Export locations.
    #[serde(default)]
    pub output: OutputConfig,
}

/// API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all endpoints are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after the first attempt.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base backoff delay in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    /// Page size of the single listing request.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Export directory and file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the exports are written to.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Compact JSON file name.
    #[serde(default = "default_json_file")]
    pub json_file: String,
    /// Detailed JSON file name.
    #[serde(default = "default_detailed_json_file")]
    pub detailed_json_file: String,
    /// CSV file name.
    #[serde(default = "default_csv_file")]
    pub csv_file: String,
    /// Spreadsheet file name.
    #[serde(default = "default_xlsx_file")]
    pub xlsx_file: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    2
}

fn default_per_page() -> u32 {
    500
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_json_file() -> String {
    "inventory_complete.json".to_string()
}

fn default_detailed_json_file() -> String {
    "inventory_detailed.json".to_string()
}

fn default_csv_file() -> String {
    "inventory_export.csv".to_string()
}

fn default_xlsx_file() -> String {
    "inventory_export.xlsx".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
            per_page: default_per_page(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            json_file: default_json_file(),
            detailed_json_file: default_detailed_json_file(),
            csv_file: default_csv_file(),
            xlsx_file: default_xlsx_file(),
        }
    }
}

impl ApiConfig {
    /// Checks the base URL and numeric limits.
    pub fn validate(&self) -> Result<(), StoreError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| StoreError::Config(format!("invalid base_url {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StoreError::Config(format!(
                "base_url must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be positive".into()));
        }
        if self.per_page == 0 {
            return Err(StoreError::Config("per_page must be positive".into()));
        }
        Ok(())
    }

    /// Builds request client settings from this section.
    pub fn client_settings(&self) -> Result<ClientSettings, StoreError> {
        self.validate()?;
        let retry = RetryPolicy::new(self.retry_attempts)
            .with_base_delay(Duration::from_secs(self.retry_delay_secs));
        Ok(ClientSettings::new(self.base_url.trim_end_matches('/'))
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry(retry))
    }
}

impl OutputConfig {
    /// Compact JSON path inside `dir`.
    pub fn json_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.json_file)
    }

    /// Detailed JSON path inside `dir`.
    pub fn detailed_json_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.detailed_json_file)
    }

    /// CSV path inside `dir`.
    pub fn csv_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.csv_file)
    }

    /// Spreadsheet path inside `dir`.
    pub fn xlsx_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.xlsx_file)
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("billbook")
            .join("config.json")
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path. A missing file yields
    /// defaults.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.api.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://mybillbook.in/api/web");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.retry_attempts, 3);
        assert_eq!(config.api.retry_delay_secs, 2);
        assert_eq!(config.api.per_page, 500);
        assert_eq!(config.output.dir, PathBuf::from("output"));
        assert_eq!(config.output.csv_file, "inventory_export.csv");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api": {"per_page": 1000}, "output": {"dir": "exports"}}"#)
            .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.per_page, 1000);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.output.dir, PathBuf::from("exports"));
        assert_eq!(config.output.json_file, "inventory_complete.json");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api": {"base_url": "not a url"}}"#).unwrap();

        assert!(matches!(Config::load_from(&path), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_client_settings() {
        let api = ApiConfig {
            base_url: "http://localhost:8080/api/".into(),
            timeout_secs: 5,
            retry_attempts: 1,
            retry_delay_secs: 0,
            per_page: 10,
        };
        let settings = api.client_settings().unwrap();
        assert_eq!(settings.base_url, "http://localhost:8080/api");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.retry.max_retries, 1);
        assert_eq!(settings.retry.base_delay, Duration::ZERO);
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let api = ApiConfig {
            base_url: "ftp://example.com".into(),
            ..ApiConfig::default()
        };
        assert!(api.validate().is_err());
    }

    #[test]
    fn test_output_paths() {
        let output = OutputConfig::default();
        let dir = Path::new("exports");
        assert_eq!(output.json_path(dir), dir.join("inventory_complete.json"));
        assert_eq!(output.detailed_json_path(dir), dir.join("inventory_detailed.json"));
        assert_eq!(output.xlsx_path(dir), dir.join("inventory_export.xlsx"));
    }
}
