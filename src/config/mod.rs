//
//  cf-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module provides the settings a session needs to build its connection
//! chains: the target API, TLS and timeout behavior, retry and polling
//! limits, request tracing and the UAA client credentials.
//!
//! ## Configuration File Location
//!
//! Settings are stored in platform-specific directories:
//!
//! - **Linux**: `~/.config/cf/config.toml`
//! - **macOS**: `~/Library/Application Support/cf/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\cf\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! target = "https://api.example.com"
//! skip_ssl_validation = false
//! dial_timeout = 5
//! max_retries = 2
//! polling_interval = 3
//! polling_timeout = 600
//! trace = "/tmp/cf-trace.log"
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `CF_DIAL_TIMEOUT` | `dial_timeout` (seconds) |
//! | `CF_TRACE` | `trace` (`true`, `false` or a file path) |
//! | `CF_POLLING_TIMEOUT` | `polling_timeout` (seconds) |
//! | `CF_SKIP_SSL_VALIDATION` | `skip_ssl_validation` |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cf_client::config::Config;
//!
//! let mut config = Config::load()?;
//! config.apply_env();
//! println!("Targeting {}", config.target);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::ConnectionConfig;

/// Where request logs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceTarget {
    Off,
    Terminal,
    Files(Vec<PathBuf>),
}

/// Session configuration.
///
/// # Examples
///
/// ```rust
/// use cf_client::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.max_retries, 2);
/// assert_eq!(config.uaa_client_id, "cf");
/// ```
///
/// # Notes
///
/// - Every field has a default, so a partial file is valid
/// - Durations are stored as whole seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API root, e.g. `https://api.example.com`
    pub target: String,

    /// Accept any certificate presented by the target.
    pub skip_ssl_validation: bool,

    /// Connection establishment timeout in seconds.
    pub dial_timeout: u64,

    /// Additional attempts for eligible requests answered with a 5xx.
    pub max_retries: usize,

    /// Seconds between job status checks.
    pub polling_interval: u64,

    /// Seconds before a polled job is reported as timed out.
    pub polling_timeout: u64,

    /// `true` for terminal tracing, a path (or several, separated by the
    /// platform path separator) for file tracing, empty or `false` for none.
    pub trace: String,

    /// Overrides the default `User-Agent`.
    pub user_agent: Option<String>,

    pub uaa_client_id: String,

    pub uaa_client_secret: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: String::new(),
            skip_ssl_validation: false,
            dial_timeout: 5,
            max_retries: 2,
            polling_interval: 3,
            polling_timeout: 600,
            trace: String::new(),
            user_agent: None,
            uaa_client_id: "cf".to_string(),
            uaa_client_secret: String::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// Returns the defaults when no file exists yet.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or an error if the file exists but cannot
    /// be read or is not valid TOML.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Saves the configuration to the default location, creating the
    /// directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path of `config.toml` in the platform config directory.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Applies `CF_*` environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Applies `CF_*` overrides read through `lookup`.
    ///
    /// Values that do not parse are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = lookup("CF_DIAL_TIMEOUT").and_then(|v| v.trim().parse().ok()) {
            self.dial_timeout = secs;
        }
        if let Some(secs) = lookup("CF_POLLING_TIMEOUT").and_then(|v| v.trim().parse().ok()) {
            self.polling_timeout = secs;
        }
        if let Some(trace) = lookup("CF_TRACE") {
            self.trace = trace.trim().to_string();
        }
        if let Some(skip) = lookup("CF_SKIP_SSL_VALIDATION").and_then(|v| parse_bool(&v)) {
            self.skip_ssl_validation = skip;
        }
    }

    pub fn dial_timeout(&self) -> Duration {
        Duration::from_secs(self.dial_timeout)
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval)
    }

    pub fn polling_timeout(&self) -> Duration {
        Duration::from_secs(self.polling_timeout)
    }

    /// Interprets the `trace` setting.
    pub fn trace_target(&self) -> TraceTarget {
        let trace = self.trace.trim();
        match parse_bool(trace) {
            Some(true) => TraceTarget::Terminal,
            Some(false) => TraceTarget::Off,
            None if trace.is_empty() => TraceTarget::Off,
            None => TraceTarget::Files(std::env::split_paths(trace).collect()),
        }
    }

    /// Settings for the HTTP transport.
    pub fn connection_config(&self) -> ConnectionConfig {
        let mut config = ConnectionConfig {
            skip_ssl_validation: self.skip_ssl_validation,
            dial_timeout: self.dial_timeout(),
            ..ConnectionConfig::default()
        };
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }

    /// Gets a setting by key, formatted as a string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cf_client::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.get("dial_timeout").as_deref(), Some("5"));
    /// assert_eq!(config.get("unknown"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "target" => Some(self.target.clone()),
            "skip_ssl_validation" => Some(self.skip_ssl_validation.to_string()),
            "dial_timeout" => Some(self.dial_timeout.to_string()),
            "max_retries" => Some(self.max_retries.to_string()),
            "polling_interval" => Some(self.polling_interval.to_string()),
            "polling_timeout" => Some(self.polling_timeout.to_string()),
            "trace" => Some(self.trace.clone()),
            "user_agent" => self.user_agent.clone(),
            "uaa_client_id" => Some(self.uaa_client_id.clone()),
            _ => None,
        }
    }

    /// Sets a setting by key.
    ///
    /// # Returns
    ///
    /// `true` if the key is known and the value parsed, `false` otherwise.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        match key {
            "target" => self.target = value,
            "skip_ssl_validation" => match parse_bool(&value) {
                Some(skip) => self.skip_ssl_validation = skip,
                None => return false,
            },
            "dial_timeout" => match value.parse() {
                Ok(secs) => self.dial_timeout = secs,
                Err(_) => return false,
            },
            "max_retries" => match value.parse() {
                Ok(n) => self.max_retries = n,
                Err(_) => return false,
            },
            "polling_interval" => match value.parse() {
                Ok(secs) => self.polling_interval = secs,
                Err(_) => return false,
            },
            "polling_timeout" => match value.parse() {
                Ok(secs) => self.polling_timeout = secs,
                Err(_) => return false,
            },
            "trace" => self.trace = value,
            "user_agent" => self.user_agent = Some(value),
            "uaa_client_id" => self.uaa_client_id = value,
            "uaa_client_secret" => self.uaa_client_secret = value,
            _ => return false,
        }
        true
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
