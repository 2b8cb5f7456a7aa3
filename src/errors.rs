// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the view synchronizer.
//!
//! This module provides specialized error types for:
//! - PowerDNS management API calls (views, networks, zones)
//! - Remote network-list fetches
//! - Loading the views configuration document
//! - Whole-pass aborts raised by the reconciliation safety rules
//!
//! Boundary calls return these as typed results. The reconciler then decides per
//! category whether a failure aborts the pass or only the single mutation.

use thiserror::Error;

/// Errors returned by the PowerDNS management API client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The API answered with a non-success HTTP status.
    #[error("{method} {url} failed with HTTP {status}: {message}")]
    Status {
        /// HTTP method of the failed request
        method: String,
        /// Full request URL
        url: String,
        /// HTTP status code returned by the server
        status: u16,
        /// Response body or error message from the server
        message: String,
    },

    /// The request never produced a response (connect error, timeout, TLS failure).
    #[error("{method} {url} could not be sent: {reason}")]
    Transport {
        /// HTTP method of the failed request
        method: String,
        /// Full request URL
        url: String,
        /// Underlying transport error
        reason: String,
    },

    /// An endpoint URL could not be built from the server URL.
    #[error("Cannot build endpoint URL from {url}: {reason}")]
    InvalidUrl {
        /// Server URL the endpoint was built on
        url: String,
        /// Parser error
        reason: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Unexpected response body from {url}: {reason}")]
    Decode {
        /// Full request URL
        url: String,
        /// Decoder error
        reason: String,
    },
}

impl ApiError {
    /// HTTP status code, if the server answered at all.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` when the server answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// `true` for 4xx answers, i.e. the server rejected the request itself.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code()
            .is_some_and(|status| (400..500).contains(&status))
    }
}

/// Errors fetching a remote network list.
///
/// The fetcher never surfaces these to the reconciler; every variant collapses
/// to "no data", which the safety rules then treat as a source-data failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connect error, DNS failure or timeout
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// Remote list URL
        url: String,
        /// Underlying transport error
        reason: String,
    },

    /// Non-2xx answer from the remote endpoint
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Remote list URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The body could not be read as text
    #[error("failed to read body from {url}: {reason}")]
    Body {
        /// Remote list URL
        url: String,
        /// Underlying read error
        reason: String,
    },
}

/// Errors loading the views configuration document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No file at the configured path
    #[error("Config not found: {path}")]
    NotFound {
        /// Configured document path
        path: String,
    },

    /// The file exists but could not be read
    #[error("Config read failed for {path}: {reason}")]
    Read {
        /// Configured document path
        path: String,
        /// I/O error
        reason: String,
    },

    /// The file is not a valid views document
    #[error("Config parse failed for {path}: {reason}")]
    Parse {
        /// Configured document path
        path: String,
        /// YAML decoder error
        reason: String,
    },
}

/// Reasons a reconciliation pass stops before issuing any mutation.
///
/// Every variant here is a source-data or baseline failure. Acting on it could
/// move whole networks to the wrong view, so the pass applies nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PassAbort {
    /// The configuration document is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A view's remote list produced zero networks.
    #[error("URL {url} of view '{view}' returned 0 networks. Safety skip.")]
    EmptyFetch {
        /// View declaring the URL
        view: String,
        /// Remote list URL
        url: String,
    },

    /// A view resolved to zero networks after combining static and fetched lists.
    #[error("View '{view}' has 0 networks. Safety skip.")]
    EmptyView {
        /// Offending view
        view: String,
    },

    /// Live views or networks could not be read from the server.
    #[error("Live state unavailable: {0}")]
    LiveStateUnavailable(#[source] ApiError),
}

impl PassAbort {
    /// Short, stable label for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::EmptyFetch { .. } => "empty_fetch",
            Self::EmptyView { .. } => "empty_view",
            Self::LiveStateUnavailable(_) => "live_state",
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
