// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0

// Checker Configuration
//
// Controller connection settings, paging and logging options. Loaded from
// YAML, discovered in the usual locations, then overridden from the
// environment so credentials never need to live in a file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "CONTRACT_CHECKER_CONFIG";
pub const DEFAULT_PAGE_SIZE: u32 = 2000;
pub const DEFAULT_LOG_FILE: &str = "contract-checker.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Controller base URL, e.g. `https://apic.example.net`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Verify the controller's TLS certificate. Controllers commonly run with
    /// self-signed certificates, so this is off unless asked for.
    #[serde(default)]
    pub verify_tls: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Records per page. Very small pages make the controller's paging unreliable.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Append-only diagnostic log written when file logging is enabled.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

impl CheckerConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Discover configuration file using precedence order
    /// 1. CONTRACT_CHECKER_CONFIG environment variable
    /// 2. ./contract-checker.yaml (working directory)
    /// 3. ~/.contract-checker/config.yaml (user home)
    /// 4. /etc/contract-checker/config.yaml (system, Unix)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./contract-checker.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".contract-checker").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        {
            let system_config = PathBuf::from("/etc/contract-checker/config.yaml");
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }

    /// Load from an explicit path (errors are fatal), else from discovery,
    /// else defaults. Environment overrides are applied in every case.
    pub fn load_or_default(cli_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else if let Some(path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else {
            tracing::debug!("No configuration file found in standard locations, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("APIC_URL") {
            self.controller.url = Some(url);
        }
        if let Some(username) = lookup("APIC_USERNAME") {
            self.controller.username = Some(username);
        }
        if let Some(password) = lookup("APIC_PASSWORD") {
            self.controller.password = Some(password);
        }
        if let Some(val) = lookup("APIC_VERIFY_TLS") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" => self.controller.verify_tls = true,
                "false" | "0" | "no" => self.controller.verify_tls = false,
                _ => tracing::warn!("Invalid APIC_VERIFY_TLS value '{}', ignoring", val),
            }
        }
        if let Some(val) = lookup("APIC_PAGE_SIZE") {
            match val.parse() {
                Ok(size) => self.fetch.page_size = size,
                Err(_) => tracing::warn!("Invalid APIC_PAGE_SIZE value '{}', ignoring", val),
            }
        }
    }

    /// Controller URL with `https://` added when no scheme was given.
    pub fn controller_url(&self) -> Option<String> {
        self.controller.url.as_deref().map(normalize_url)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.page_size == 0 {
            return Err(ConfigError::Invalid("fetch.page_size must be greater than 0".into()));
        }
        match self.controller.url.as_deref().map(str::trim) {
            None | Some("") => Err(ConfigError::Invalid("controller.url cannot be empty".into())),
            Some(_) => Ok(()),
        }
    }
}

pub fn normalize_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}
