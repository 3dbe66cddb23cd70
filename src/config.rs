// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings are read from a YAML file (`framemeasure.yaml` in the working
//! directory, or the file named by `FRAMEMEASURE_CONFIG`). The backend URL
//! can be overridden with `FRAMEMEASURE_BACKEND_URL`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "FRAMEMEASURE_CONFIG";
/// Environment variable overriding the backend URL.
pub const BACKEND_URL_ENV: &str = "FRAMEMEASURE_BACKEND_URL";
const DEFAULT_CONFIG_FILE: &str = "framemeasure.yaml";

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the measurement backend
    pub backend_url: String,
    /// Timeout applied to every backend request
    pub request_timeout_secs: u64,
    /// Computation method sent with area calculations
    pub area_method: String,
    /// Snapshots kept in the undo history
    pub max_history: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
            area_method: "scikit".to_string(),
            max_history: crate::history::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults.
    ///
    /// A malformed file is reported and ignored rather than aborting startup.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            match Self::from_file(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to load config, using defaults: {:#}", e);
                    Self::default()
                }
            }
        } else {
            log::info!("No config file found, using defaults");
            Self::default()
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config.apply_backend_override(&url);
        }
        config
    }

    /// Read configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    fn apply_backend_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            log::info!("Using backend URL from {}: {}", BACKEND_URL_ENV, url);
            self.backend_url = url.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("backend_url: http://lab-server:9000\n").unwrap();

        assert_eq!(config.backend_url, "http://lab-server:9000");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.area_method, "scikit");
        assert_eq!(config.max_history, crate::history::DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!(
            "framemeasure-config-test-{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, "max_history: [not, a, number]\n").unwrap();

        let result = AppConfig::from_file(&path);
        let _ = std::fs::remove_file(&path);

        assert!(result.is_err());
    }

    #[test]
    fn test_backend_override_ignores_blank() {
        let mut config = AppConfig::default();
        config.apply_backend_override("   ");
        assert_eq!(config.backend_url, AppConfig::default().backend_url);

        config.apply_backend_override(" http://10.0.0.5:8000 ");
        assert_eq!(config.backend_url, "http://10.0.0.5:8000");
    }
}
