// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line and environment settings.
//!
//! Every flag can also be supplied through an environment variable, so the
//! binary runs unchanged as a container sidecar. [`Cli::into_settings`]
//! validates the raw values before anything touches the network.

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_CONFIG_PATH, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SERVER_ID,
    DEFAULT_SYNC_INTERVAL_SECS, MAX_DURATION_SECS,
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Keep PowerDNS views and network routing in sync with a YAML document.
#[derive(Parser, Debug, Clone)]
#[command(name = "viewsync", version, about)]
pub struct Cli {
    /// Base URL of the PowerDNS HTTP API
    #[arg(long, env = "PDNS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// API key sent as X-API-Key on every request
    #[arg(long, env = "PDNS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Server id in API paths
    #[arg(long, env = "PDNS_SERVER_ID", default_value = DEFAULT_SERVER_ID)]
    pub server_id: String,

    /// Path of the views configuration document
    #[arg(long, env = "SYNC_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Seconds between passes
    #[arg(long, env = "SYNC_INTERVAL", default_value_t = DEFAULT_SYNC_INTERVAL_SECS)]
    pub interval: f64,

    /// Timeout in seconds for every outbound HTTP request
    #[arg(long, env = "SYNC_HTTP_TIMEOUT", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub timeout: f64,

    /// Address to serve Prometheus metrics on (disabled when unset)
    #[arg(long, env = "SYNC_METRICS_ADDR")]
    pub metrics_bind_address: Option<SocketAddr>,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,
}

/// Rejected startup settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("PDNS_API_KEY is required")]
    MissingApiKey,

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("Invalid {name} '{value}': must be a positive number of seconds up to {MAX_DURATION_SECS}")]
    InvalidDuration { name: &'static str, value: String },
}

/// Validated runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub api_key: String,
    pub server_id: String,
    pub config_path: PathBuf,
    pub interval: Duration,
    pub timeout: Duration,
    pub metrics_bind_address: Option<SocketAddr>,
    pub once: bool,
}

impl Cli {
    /// Validate the raw values.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the API key is missing or blank, the API
    /// URL is not an absolute `http(s)` URL, or a duration is not positive or
    /// exceeds [`MAX_DURATION_SECS`].
    pub fn into_settings(self) -> Result<Settings, SettingsError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(SettingsError::MissingApiKey)?;

        Ok(Settings {
            api_url: validate_api_url(&self.api_url)?,
            api_key,
            server_id: self.server_id,
            config_path: self.config,
            interval: positive_duration("interval", self.interval)?,
            timeout: positive_duration("timeout", self.timeout)?,
            metrics_bind_address: self.metrics_bind_address,
            once: self.once,
        })
    }
}

/// Parse the API URL and return it without a trailing slash.
fn validate_api_url(raw: &str) -> Result<String, SettingsError> {
    let invalid = |reason: String| SettingsError::InvalidApiUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

/// Values above [`MAX_DURATION_SECS`] would overflow the scheduler's timer.
fn positive_duration(name: &'static str, secs: f64) -> Result<Duration, SettingsError> {
    Some(secs)
        .filter(|secs| *secs <= MAX_DURATION_SECS)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .filter(|d| !d.is_zero())
        .ok_or_else(|| SettingsError::InvalidDuration {
            name,
            value: secs.to_string(),
        })
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
