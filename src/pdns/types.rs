// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types for the PowerDNS management API.

use crate::constants::DEFAULT_VIEW;
use serde::{Deserialize, Serialize};

/// Response of `GET /servers/{id}/views`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ViewList {
    /// Names of all views known to the server
    #[serde(default)]
    pub views: Vec<String>,
}

/// Response of `GET /servers/{id}/views/{view}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ViewDetails {
    /// Zone variants attached to the view
    #[serde(default)]
    pub zones: Vec<String>,
}

/// One network-to-view mapping as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEntry {
    /// CIDR of the client network
    pub network: String,
    /// Assigned view; missing, `null` or empty means `default`
    #[serde(default)]
    pub view: Option<String>,
}

impl NetworkEntry {
    /// Effective view of this network.
    #[must_use]
    pub fn view_or_default(&self) -> &str {
        match self.view.as_deref() {
            Some(view) if !view.is_empty() => view,
            _ => DEFAULT_VIEW,
        }
    }
}

/// Response of `GET /servers/{id}/networks`.
///
/// Servers answer either with a bare array or with an object wrapping it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NetworkList {
    /// `[{"network": ..., "view": ...}, ...]`
    Bare(Vec<NetworkEntry>),
    /// `{"networks": [...]}`
    Wrapped {
        /// Wrapped mappings
        #[serde(default)]
        networks: Vec<NetworkEntry>,
    },
}

impl NetworkList {
    /// Flatten either shape into the list of mappings.
    #[must_use]
    pub fn into_entries(self) -> Vec<NetworkEntry> {
        match self {
            Self::Bare(entries) | Self::Wrapped { networks: entries } => entries,
        }
    }
}

/// Body of `PUT /servers/{id}/networks/{cidr}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetNetworkViewRequest<'a> {
    /// Target view
    pub view: &'a str,
}

/// Body of `POST /servers/{id}/views/{view}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateViewRequest {
    /// Zone variant to attach; the view exists as long as it holds a zone
    pub name: String,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
