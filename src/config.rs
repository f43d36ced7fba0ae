//! Application configuration.
//!
//! Loaded from TOML with three optional sections:
//!
//! ```toml
//! [service]
//! base_url = "http://10.0.0.5:8000"
//! timeout_seconds = 60
//!
//! [search]
//! page_size = 10
//! sort = "year_desc"
//! auto_cutoff = false
//!
//! [ui]
//! copy_ack_ms = 1500
//! emphasis = "*"
//! ```
//!
//! The service base URL may also come from the environment, which wins over
//! the file.

use std::path::{Path, PathBuf};

use reco_client::config::{DEFAULT_BASE_URL, normalize_base_url};
use reco_client::{ClientConfig, ResultFilter, SortMode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variables consulted for the base URL, in priority order.
pub const BASE_URL_ENV_VARS: [&str; 2] = ["API_BASE_URL", "NEXT_PUBLIC_API_BASE_URL"];

/// Where to find the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL; falls back to the environment and then the loopback default.
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
    pub user_agent: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: 60,
            user_agent: None,
        }
    }
}

/// Request sizes and initial view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub citation_top_k: usize,
    pub supervisor_top_k: usize,
    pub page_size: usize,
    pub auto_cutoff: bool,
    pub cutoff_max_keep: usize,
    /// Initial citation order.
    pub sort: SortMode,
    /// Initial category filter.
    pub show: ResultFilter,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            citation_top_k: 50,
            supervisor_top_k: 10,
            page_size: 10,
            auto_cutoff: false,
            cutoff_max_keep: 30,
            sort: SortMode::default(),
            show: ResultFilter::default(),
        }
    }
}

/// Terminal presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long "copied" stays visible after a copy, in milliseconds.
    pub copy_ack_ms: u64,
    /// Marker printed around highlighted terms.
    pub emphasis: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            copy_ack_ms: 1500,
            emphasis: "*".to_owned(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub search: SearchConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `<config_dir>/dinus-reco/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dinus-reco").join("config.toml"))
    }

    /// Load from `explicit` if given, else from [`default_path`](Self::default_path)
    /// when that file exists, else defaults.
    ///
    /// # Errors
    ///
    /// An explicit path that cannot be loaded is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Resolve the base URL from the process environment and this config.
    pub fn resolve_base_url(&self) -> String {
        self.resolve_base_url_from(|key| std::env::var(key).ok())
    }

    /// Resolve the base URL with a custom variable lookup.
    ///
    /// Order: `API_BASE_URL`, `NEXT_PUBLIC_API_BASE_URL`, the file's
    /// `service.base_url`, then the loopback default. Blank values are skipped.
    pub fn resolve_base_url_from(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        let from_env = BASE_URL_ENV_VARS
            .iter()
            .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()));
        [from_env, self.service.base_url.clone()]
            .into_iter()
            .flatten()
            .map(|url| normalize_base_url(&url))
            .find(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
    }

    /// Build the immutable client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Client`] if the resulting configuration is invalid.
    pub fn client_config(&self) -> Result<ClientConfig> {
        self.client_config_with(|key| std::env::var(key).ok())
    }

    /// [`client_config`](Self::client_config) with a custom variable lookup.
    pub fn client_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<ClientConfig> {
        let config = ClientConfig {
            timeout_seconds: self.service.timeout_seconds,
            user_agent: self.service.user_agent.clone(),
            citation_top_k: self.search.citation_top_k,
            supervisor_top_k: self.search.supervisor_top_k,
            page_size: self.search.page_size,
            auto_cutoff: self.search.auto_cutoff,
            cutoff_max_keep: self.search.cutoff_max_keep,
            copy_ack_ms: self.ui.copy_ack_ms,
            ..ClientConfig::default()
        }
        .with_base_url(&self.resolve_base_url_from(lookup));
        config.validate()?;
        Ok(config)
    }
}
