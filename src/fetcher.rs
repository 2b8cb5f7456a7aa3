// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Remote network-list fetching.
//!
//! Views may source networks from a plaintext URL (cloud provider ranges, VPN
//! allow-lists, ...). The body is one network per line; blank lines and `#`
//! comments are skipped. Any failure yields an empty list, which the desired-state
//! builder treats as a reason to abort the pass.

use crate::errors::FetchError;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, info, warn};

/// Source of remote network lists.
///
/// Implementations never fail: an unreachable or broken source is an empty list.
#[async_trait]
pub trait NetworkListFetcher: Send + Sync {
    /// Fetch the networks listed at `url`, in document order.
    async fn fetch_networks(&self, url: &str) -> Vec<String>;
}

/// Parse a single list line, returning the network it carries.
///
/// Only lines containing `.` or `:` are kept, which accepts IPv4 and IPv6
/// literals and CIDRs without validating them further.
#[must_use]
pub fn parse_network_line(line: &str) -> Option<&str> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if line.contains('.') || line.contains(':') {
        Some(line)
    } else {
        None
    }
}

/// Parse a whole list body.
#[must_use]
pub fn parse_network_list(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(parse_network_line)
        .map(str::to_string)
        .collect()
}

/// Download the raw list body.
///
/// # Errors
///
/// Returns a [`FetchError`] for transport failures, non-2xx statuses and unreadable bodies.
pub async fn fetch_list_text(client: &HttpClient, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| FetchError::Body {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// [`NetworkListFetcher`] over plain HTTP(S).
///
/// Uses its own client so the management API key is never sent to third-party list hosts.
#[derive(Debug, Clone)]
pub struct HttpListFetcher {
    client: HttpClient,
}

impl HttpListFetcher {
    /// Wrap an HTTP client. The client's timeout bounds every fetch.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NetworkListFetcher for HttpListFetcher {
    async fn fetch_networks(&self, url: &str) -> Vec<String> {
        info!(url = %url, "Fetching network list");

        match fetch_list_text(&self.client, url).await {
            Ok(body) => {
                let networks = parse_network_list(&body);
                debug!(url = %url, count = networks.len(), "Fetched network list");
                networks
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Fetch failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod fetcher_tests;
