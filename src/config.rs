use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

pub const API_URL_ENV: &str = "CHEMLAB_API_URL";
pub const UPLOADS_URL_ENV: &str = "CHEMLAB_UPLOADS_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub api: ApiConfig,

    pub session: SessionConfig,

    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// `pretty` or `json`
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,

    /// Prefix that item and profile images are served from.
    pub uploads_url: String,

    /// 0 disables the timeout.
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            uploads_url: "http://localhost:8000/uploads".to_string(),
            request_timeout_seconds: 0,
        }
    }
}

impl ApiConfig {
    /// Full URL of an uploaded file such as `Item::image_url`.
    #[must_use]
    pub fn upload_url(&self, file_name: &str) -> String {
        format!(
            "{}/{}",
            self.uploads_url.trim_end_matches('/'),
            file_name.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the access token is kept between invocations.
    pub token_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let path = dirs::data_dir().map_or_else(
            || PathBuf::from(".chemlab").join("session"),
            |dir| dir.join("chemlab").join("session"),
        );

        Self {
            token_path: path.to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: String,

    /// chrono format string used for dates in CSV files.
    pub date_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            date_format: "%-m/%-d/%Y".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("chemlab.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("chemlab").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".chemlab").join("config.toml"));
        }

        paths
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("chemlab.toml")
    }

    /// Writes a default config to `path` unless one already exists.
    pub fn create_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(UPLOADS_URL_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, api_url: Option<String>, uploads_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(url) = uploads_url.filter(|u| !u.trim().is_empty()) {
            self.api.uploads_url = url;
        }
    }

    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        PathBuf::from(&self.session.token_path)
    }

    pub fn validate(&self) -> Result<()> {
        check_http_url("api.base_url", &self.api.base_url)?;
        check_http_url("api.uploads_url", &self.api.uploads_url)?;

        if self.session.token_path.trim().is_empty() {
            anyhow::bail!("session.token_path cannot be empty");
        }

        if self.export.date_format.trim().is_empty() {
            anyhow::bail!("export.date_format cannot be empty");
        }

        let mut probe = String::new();
        if write!(probe, "{}", Utc::now().format(&self.export.date_format)).is_err() {
            anyhow::bail!(
                "export.date_format is not a valid date format: '{}'",
                self.export.date_format
            );
        }

        if !matches!(self.general.log_format.as_str(), "pretty" | "json") {
            anyhow::bail!(
                "general.log_format must be 'pretty' or 'json', got '{}'",
                self.general.log_format
            );
        }

        Ok(())
    }
}

fn check_http_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).with_context(|| format!("{field} is not a valid URL: {value}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("{field} must use http or https, got '{}'", url.scheme());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.request_timeout_seconds, 0);
        assert_eq!(config.export.date_format, "%-m/%-d/%Y");
        assert!(config.session.token_path.ends_with("session"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[session]"));
        assert!(toml_str.contains("[export]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [api]
            base_url = "https://lab.example.edu/api"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.api.base_url, "https://lab.example.edu/api");

        assert_eq!(config.api.uploads_url, "http://localhost:8000/uploads");
        assert_eq!(config.export.directory, ".");
    }

    #[test]
    fn test_overrides_replace_urls() {
        let mut config = Config::default();
        config.apply_overrides(Some("http://10.0.0.5:9000/api".to_string()), None);
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000/api");
        assert_eq!(config.api.uploads_url, "http://localhost:8000/uploads");

        config.apply_overrides(Some("  ".to_string()), None);
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000/api");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config::default();
        config.api.base_url = "ftp://lab/api".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_date_format() {
        let mut config = Config::default();
        config.export.date_format = "%Q".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.general.log_format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_upload_url_joins_cleanly() {
        let api = ApiConfig {
            uploads_url: "http://lab/uploads/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(api.upload_url("beaker.png"), "http://lab/uploads/beaker.png");
        assert_eq!(api.upload_url("/beaker.png"), "http://lab/uploads/beaker.png");
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir()
            .join(format!("chemlab-config-{}", uuid::Uuid::new_v4()))
            .join("chemlab.toml");

        assert!(Config::create_default_if_missing(&path).unwrap());
        assert!(!Config::create_default_if_missing(&path).unwrap());

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.api.base_url, Config::default().api.base_url);

        if let Some(parent) = path.parent() {
            std::fs::remove_dir_all(parent).ok();
        }
    }
}
