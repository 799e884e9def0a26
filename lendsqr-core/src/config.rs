//! Configuration management
//!
//! Settings live in `<dir>/settings.json`:
//! ```json
//! {
//!   "app": {
//!     "mode": "development",
//!     "apiBaseUrl": "http://localhost:3001",
//!     "perPage": 10,
//!     "loginDelayMs": 1000
//!   }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::services::{DEFAULT_LOGIN_DELAY, DEFAULT_PER_PAGE};

pub const SETTINGS_FILE: &str = "settings.json";

/// Users API used by development builds (the local JSON server)
pub const DEVELOPMENT_API_URL: &str = "http://localhost:3001";

/// Users API used by production builds
pub const PRODUCTION_API_URL: &str = "https://lendsqr-api.onrender.com";

/// Selects the default API base URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        }
    }

    pub fn default_api_url(&self) -> &'static str {
        match self {
            BuildMode::Development => DEVELOPMENT_API_URL,
            BuildMode::Production => PRODUCTION_API_URL,
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(BuildMode::Development),
            "production" | "prod" => Ok(BuildMode::Production),
            other => bail!("Unknown mode '{}': expected development or production", other),
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mode: Option<BuildMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    per_page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    login_delay_ms: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Lendsqr configuration (resolved view of settings and environment)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: BuildMode,
    /// Explicit API base URL; `None` means the mode's default
    pub api_base_url: Option<String>,
    pub per_page: usize,
    pub login_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: BuildMode::default(),
            api_base_url: None,
            per_page: DEFAULT_PER_PAGE,
            login_delay_ms: DEFAULT_LOGIN_DELAY.as_millis() as u64,
        }
    }
}

fn read_settings(settings_path: &Path) -> Result<SettingsFile> {
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

impl Config {
    /// Load config from the data directory
    ///
    /// `LENDSQR_MODE` and `LENDSQR_API_URL` override the file.
    pub fn load(dir: &Path) -> Result<Self> {
        let raw = read_settings(&dir.join(SETTINGS_FILE))?;
        Self::from_settings(raw.app, |key| std::env::var(key).ok())
    }

    /// Load only what settings.json says, ignoring environment overrides
    ///
    /// Used before `save` so an override is never written back to the file.
    pub fn load_file(dir: &Path) -> Result<Self> {
        let raw = read_settings(&dir.join(SETTINGS_FILE))?;
        Self::from_settings(raw.app, |_| None)
    }

    fn from_settings(app: AppSettings, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let mut config = Self {
            mode: app.mode.unwrap_or(defaults.mode),
            api_base_url: app.api_base_url.filter(|url| !url.trim().is_empty()),
            per_page: app.per_page.filter(|&n| n > 0).unwrap_or(defaults.per_page),
            login_delay_ms: app.login_delay_ms.unwrap_or(defaults.login_delay_ms),
        };

        if let Some(mode) = env("LENDSQR_MODE").filter(|v| !v.trim().is_empty()) {
            config.mode = mode.parse()?;
        }
        if let Some(url) = env("LENDSQR_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_base_url = Some(url);
        }

        validate_api_url(&config.api_base_url())?;
        Ok(config)
    }

    /// Save config to the data directory, preserving unmanaged settings
    pub fn save(&self, dir: &Path) -> Result<()> {
        let settings_path = dir.join(SETTINGS_FILE);
        let mut settings = read_settings(&settings_path)?;

        settings.app.mode = Some(self.mode);
        settings.app.api_base_url = self.api_base_url.clone();
        settings.app.per_page = Some(self.per_page);
        settings.app.login_delay_ms = Some(self.login_delay_ms);

        std::fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Effective users API base URL
    pub fn api_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| self.mode.default_api_url().to_string())
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

/// Reject anything that is not an absolute http(s) URL
pub fn validate_api_url(raw: &str) -> Result<()> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => bail!("Invalid API URL '{}': {}", raw, e),
    };
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Invalid API URL '{}': scheme must be http or https", raw);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let raw = read_settings(&dir.path().join(SETTINGS_FILE)).unwrap();
        let config = Config::from_settings(raw.app, no_env).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url(), DEVELOPMENT_API_URL);
        assert_eq!(config.login_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_production_mode_url() {
        let app = AppSettings {
            mode: Some(BuildMode::Production),
            ..Default::default()
        };
        let config = Config::from_settings(app, no_env).unwrap();
        assert_eq!(config.api_base_url(), PRODUCTION_API_URL);
    }

    #[test]
    fn test_env_overrides_file() {
        let app = AppSettings {
            mode: Some(BuildMode::Development),
            api_base_url: Some("http://file.example".to_string()),
            ..Default::default()
        };
        let config = Config::from_settings(app, |key| match key {
            "LENDSQR_MODE" => Some("prod".to_string()),
            "LENDSQR_API_URL" => Some("http://127.0.0.1:9000".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.mode, BuildMode::Production);
        assert_eq!(config.api_base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_mode = Config::from_settings(AppSettings::default(), |key| {
            (key == "LENDSQR_MODE").then(|| "staging".to_string())
        });
        assert!(bad_mode.is_err());

        let bad_url = AppSettings {
            api_base_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(Config::from_settings(bad_url, no_env).is_err());
        assert!(validate_api_url("not a url").is_err());
    }

    #[test]
    fn test_zero_per_page_falls_back() {
        let app = AppSettings {
            per_page: Some(0),
            ..Default::default()
        };
        assert_eq!(Config::from_settings(app, no_env).unwrap().per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_load_file_reads_saved_settings() {
        let dir = tempdir().unwrap();
        let config = Config {
            api_base_url: Some("http://127.0.0.1:4000".to_string()),
            per_page: 50,
            ..Config::default()
        };
        config.save(dir.path()).unwrap();

        assert_eq!(Config::load_file(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(
            &path,
            r#"{"app": {"theme": "dark", "perPage": 25}, "extra": {"keep": true}}"#,
        )
        .unwrap();

        let raw = read_settings(&path).unwrap();
        let mut config = Config::from_settings(raw.app, no_env).unwrap();
        assert_eq!(config.per_page, 25);

        config.mode = BuildMode::Production;
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["app"]["theme"], "dark");
        assert_eq!(saved["app"]["mode"], "production");
        assert_eq!(saved["app"]["perPage"], 25);
        assert_eq!(saved["extra"]["keep"], true);
    }
}
