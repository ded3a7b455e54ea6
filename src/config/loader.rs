use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::{header_value, ModelId};
use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/oceanid/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("oceanid").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The service base URL is an http(s) URL
    /// - Timeouts, status TTL and tick rate are non-zero
    /// - The default model, if any, is a known model id
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = &self.service.base_url;
        match reqwest::Url::parse(base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::ValidationError {
                    message: format!("Service base_url '{}' is not an http(s) URL", base_url),
                });
            }
        }

        let credentials = [
            (
                "session_cookie",
                self.service.session_cookie.as_ref().map(|v| format!("sessionid={}", v)),
            ),
            ("csrf_token", self.service.csrf_token.clone()),
        ];
        for (header, value) in credentials {
            if let Some(value) = value {
                if let Err(err) = header_value(header, &value) {
                    return Err(ConfigError::ValidationError {
                        message: err.to_string(),
                    });
                }
            }
        }

        if self.service.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "timeout_seconds must be greater than zero".to_string(),
            });
        }

        if self.ui.status_ttl_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "status_ttl_ms must be greater than zero".to_string(),
            });
        }

        if self.ui.tick_rate_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "tick_rate_ms must be greater than zero".to_string(),
            });
        }

        if let Some(model) = &self.ui.default_model {
            if let Err(err) = ModelId::parse_choice(model) {
                return Err(ConfigError::ValidationError {
                    message: format!("default_model: {}", err),
                });
            }
        }

        Ok(())
    }

    /// The preselected model from `[ui] default_model`, if it names one.
    pub fn default_model(&self) -> Option<ModelId> {
        self.ui
            .default_model
            .as_deref()
            .and_then(|raw| ModelId::parse_choice(raw).ok().flatten())
    }
}
