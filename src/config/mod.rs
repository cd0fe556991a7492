use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::api::{ApiConfig, DEFAULT_API_URL};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the KPI backend
    pub api_url: String,
    /// Optional bearer token sent with every request
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    /// Splash duration before the shell becomes interactive
    pub startup_delay_ms: u64,
    pub log_file: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `SECDASH_LOG`
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            request_timeout_secs: 10,
            startup_delay_ms: 1000,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn api(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_url.clone(),
            token: self.api_token.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("secdash.log")))
    }
}

/// Load from `path`, or from the default location. Missing or invalid files yield defaults.
pub fn load(path: Option<&Path>) -> Config {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content).unwrap_or_default()
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("SECDASH_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("secdash").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("secdash").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "secdash", "secdash")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("secdash"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("secdash"));
    }
    directories::ProjectDirs::from("io", "secdash", "secdash")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn settings_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("settings.sqlite3"))
}

pub fn exports_dir() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("exports"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse("api_url = \"https://kpi.internal:8443\"\nstartup_delay_ms = 0\n").unwrap();
        assert_eq!(config.api_url, "https://kpi.internal:8443");
        assert_eq!(config.startup_delay(), Duration::ZERO);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.log_level, "info");
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_api_config_clamps_timeout() {
        let config = parse("request_timeout_secs = 0\napi_token = \"abc\"").unwrap();
        let api = config.api();
        assert_eq!(api.timeout, Duration::from_secs(1));
        assert_eq!(api.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(Some(&dir.path().join("absent.toml")));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
