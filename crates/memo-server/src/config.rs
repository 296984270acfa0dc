//! Server configuration loaded from TOML.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;

use memo_service::PageLimits;

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("Failed to read config file {path}: {reason}")]
    Read {
        /// Path that was read
        path: String,
        /// Underlying IO error
        reason: String,
    },

    /// The file is not valid TOML for [`ServerConfig`]
    #[error("Failed to parse config file {path}: {reason}")]
    Parse {
        /// Path that was parsed
        path: String,
        /// Parser message
        reason: String,
    },

    /// A field holds an unusable value
    #[error("Invalid configuration: {field} - {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Memo server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Cookie carrying the session token
    pub session_cookie: String,
    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,
    /// Longest memo body accepted, in characters
    pub max_content_length: usize,
    /// Page size when a listing gives none
    pub default_page_size: usize,
    /// Largest page size a listing may ask for
    pub max_page_size: usize,
    /// Session token to owner id
    pub sessions: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:9090".to_string(),
            log_level: "info".to_string(),
            session_cookie: "memo-session".to_string(),
            cors_origins: vec!["*".to_string()],
            max_content_length: 4096,
            default_page_size: 20,
            max_page_size: 100,
            sessions: BTreeMap::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `path`, falling back to defaults when it is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: ServerConfig = toml::from_str(&config_str).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check field values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        if self.max_content_length == 0 {
            return Err(ConfigError::invalid("max_content_length", "must be positive"));
        }
        if self.max_page_size == 0 || self.default_page_size == 0 {
            return Err(ConfigError::invalid("page size", "must be positive"));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::invalid(
                "default_page_size",
                format!(
                    "{} exceeds max_page_size {}",
                    self.default_page_size, self.max_page_size
                ),
            ));
        }
        if self.session_cookie.trim().is_empty() {
            return Err(ConfigError::invalid("session_cookie", "must not be empty"));
        }
        for origin in &self.cors_origins {
            if origin != "*" && HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::invalid(
                    "cors_origins",
                    format!("{origin:?} is not a valid origin"),
                ));
            }
        }
        if let Some((token, _)) = self
            .sessions
            .iter()
            .find(|(token, owner)| token.is_empty() || owner.is_empty())
        {
            return Err(ConfigError::invalid(
                "sessions",
                format!("empty token or owner for entry {token:?}"),
            ));
        }
        Ok(())
    }

    /// Parsed bind address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_address
            .parse()
            .map_err(|e| ConfigError::invalid("bind_address", format!("{e}")))
    }

    /// Page limits for the service
    pub fn page_limits(&self) -> PageLimits {
        PageLimits::new(self.default_page_size, self.max_page_size)
    }
}
