use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime settings. Read from `config.json`, then environment overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base of the backend API, e.g. `http://localhost:7889/api/v1`.
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Pause between a successful save/delete and the return to the list.
    pub redirect_delay_ms: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:7889/api/v1".to_string(),
            request_timeout_secs: 30,
            redirect_delay_ms: 3000,
            log_level: "info".to_string(),
        }
    }
}

/// Get the config file path.
/// Uses SERVERDECK_CONFIG env var, or falls back to the platform config dir.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SERVERDECK_CONFIG") {
        Some(PathBuf::from(path))
    } else {
        dirs::config_dir().map(|dir| dir.join("serverdeck").join("config.json"))
    }
}

impl Config {
    /// Load settings. Never fails; the second value is a problem worth logging.
    pub fn load() -> (Self, Option<String>) {
        let (mut config, problem) = match config_path() {
            Some(path) if path.exists() => match Self::from_file(&path) {
                Ok(config) => (config, None),
                Err(e) => (Self::default(), Some(e)),
            },
            _ => (Self::default(), None),
        };
        config.apply_overrides(
            std::env::var("SERVERDECK_API_URL").ok(),
            std::env::var("SERVERDECK_LOG").ok(),
        );
        (config, problem)
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        serde_json::from_str(&raw).map_err(|e| format!("Invalid config {}: {e}", path.display()))
    }

    fn apply_overrides(&mut self, api_url: Option<String>, log_level: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(level) = log_level.filter(|l| !l.trim().is_empty()) {
            self.log_level = level.trim().to_string();
        }
    }

    pub fn max_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}
