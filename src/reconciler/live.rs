// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Live-state reader.

use super::NetworkMap;
use crate::constants::DEFAULT_VIEW;
use crate::errors::PassAbort;
use crate::pdns::ViewApi;
use std::collections::BTreeSet;
use tracing::{debug, error};

/// Views and network mappings currently on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveState {
    /// View names, always including `default`
    pub views: BTreeSet<String>,
    /// Network to effective view
    pub networks: NetworkMap,
}

impl LiveState {
    /// Build a live state from raw parts, adding the implicit `default` view.
    #[must_use]
    pub fn new<V, S>(views: V, networks: NetworkMap) -> Self
    where
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut views: BTreeSet<String> = views.into_iter().map(Into::into).collect();
        views.insert(DEFAULT_VIEW.to_string());
        Self { views, networks }
    }
}

/// Read views and network mappings from the server.
///
/// # Errors
///
/// Returns [`PassAbort::LiveStateUnavailable`] if either listing fails. The pass must
/// not mutate anything against an unknown baseline.
pub async fn read_live_state(api: &dyn ViewApi) -> Result<LiveState, PassAbort> {
    let views = api.list_views().await.map_err(|e| {
        error!(error = %e, "State fetch failed: views");
        PassAbort::LiveStateUnavailable(e)
    })?;

    let entries = api.list_networks().await.map_err(|e| {
        error!(error = %e, "State fetch failed: networks");
        PassAbort::LiveStateUnavailable(e)
    })?;

    let networks = entries
        .iter()
        .map(|entry| (entry.network.clone(), entry.view_or_default().to_string()))
        .collect();

    let live = LiveState::new(views, networks);
    debug!(
        views = live.views.len(),
        networks = live.networks.len(),
        "Read live state"
    );
    Ok(live)
}

#[cfg(test)]
#[path = "live_tests.rs"]
mod live_tests;
