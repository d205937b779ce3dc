// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{KonturwerkError, Result};
use crate::params::ParameterSet;

/// Name of the persisted settings file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides [`AppConfig::service_url`].
pub const SERVICE_URL_ENV: &str = "KONTURWERK_SERVICE_URL";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the processing service (endpoints are appended to it).
    pub service_url: String,
    /// Timeout for a single processing or export request.
    pub request_timeout_secs: u64,
    /// Parameter values loaded into the form at startup.
    pub default_parameters: ParameterSet,
    /// Where exported drawings are written. `None` uses the data directory.
    pub download_dir: Option<PathBuf>,
    /// Show a save dialog for every export instead of writing straight to
    /// the download directory.
    pub ask_where_to_save: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:5000".into(),
            request_timeout_secs: 30,
            default_parameters: ParameterSet::default(),
            download_dir: None,
            ask_where_to_save: false,
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Load settings from `dir/config.json`, then apply environment overrides.
    ///
    /// A missing file yields defaults. A file that exists but cannot be parsed
    /// is reported as [`KonturwerkError::Config`] so the caller can decide
    /// whether to fall back.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str::<Self>(&data)
                .map_err(|e| KonturwerkError::Config(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        config.apply_env_override(std::env::var(SERVICE_URL_ENV).ok());
        info!(service_url = %config.service_url, "configuration loaded");
        Ok(config)
    }

    /// Like [`AppConfig::load`], but never fails.
    pub fn load_or_default(dir: &Path) -> Self {
        Self::load(dir).unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default configuration");
            let mut config = Self::default();
            config.apply_env_override(std::env::var(SERVICE_URL_ENV).ok());
            config
        })
    }

    /// Write settings to `dir/config.json`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }

    fn apply_env_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.service_url = url.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.default_parameters, ParameterSet::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            request_timeout_secs: 5,
            ask_where_to_save: true,
            ..AppConfig::default()
        };
        config.save(dir.path()).unwrap();
        let loaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.request_timeout_secs, 5);
        assert!(loaded.ask_where_to_save);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"request_timeout_secs": 9}"#).unwrap();
        let loaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.request_timeout_secs, 9);
        assert_eq!(loaded.default_parameters.threshold_value, 245);
    }

    #[test]
    fn garbage_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{not json").unwrap();
        assert!(matches!(
            AppConfig::load(dir.path()),
            Err(KonturwerkError::Config(_))
        ));
    }

    #[test]
    fn env_override_replaces_url() {
        let mut config = AppConfig::default();
        config.apply_env_override(Some(" http://10.0.0.2:5000 ".into()));
        assert_eq!(config.service_url, "http://10.0.0.2:5000");
        config.apply_env_override(Some("".into()));
        assert_eq!(config.service_url, "http://10.0.0.2:5000");
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
