// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired-state construction.
//!
//! Views are processed in ascending priority. Each contributes its static networks
//! followed by its fetched ones, and the resulting `(network, view)` pairs are folded
//! into one mapping where later pairs win. Two safety rules stop the pass before any
//! write if a source looks broken.

use super::NetworkMap;
use crate::config::{ViewConfig, ViewSet};
use crate::errors::PassAbort;
use crate::fetcher::NetworkListFetcher;
use tracing::{debug, warn};

/// Fold ordered `(network, view)` assignments into a mapping.
///
/// Last write wins: when a network appears more than once, the view of its final
/// occurrence is kept. Callers order pairs by ascending priority, so the view with
/// the highest priority value owns contested networks.
#[must_use]
pub fn merge_assignments<I, N, V>(assignments: I) -> NetworkMap
where
    I: IntoIterator<Item = (N, V)>,
    N: Into<String>,
    V: Into<String>,
{
    assignments
        .into_iter()
        .fold(NetworkMap::new(), |mut mapping, (network, view)| {
            mapping.insert(network.into(), view.into());
            mapping
        })
}

/// Assemble the networks of a single view: static entries, then fetched ones.
///
/// # Errors
///
/// Returns [`PassAbort::EmptyFetch`] when the view's URL yields nothing and
/// [`PassAbort::EmptyView`] when the view ends up with no networks at all.
pub async fn collect_view_networks(
    name: &str,
    view: &ViewConfig,
    fetcher: &dyn NetworkListFetcher,
) -> Result<Vec<String>, PassAbort> {
    let mut networks = view.networks.clone().unwrap_or_default();

    if let Some(url) = view.url.as_deref() {
        let fetched = fetcher.fetch_networks(url).await;
        if fetched.is_empty() {
            return Err(PassAbort::EmptyFetch {
                view: name.to_string(),
                url: url.to_string(),
            });
        }
        debug!(view = %name, url = %url, count = fetched.len(), "Merged fetched networks");
        networks.extend(fetched);
    }

    if networks.is_empty() {
        return Err(PassAbort::EmptyView {
            view: name.to_string(),
        });
    }

    Ok(networks)
}

/// Compute the desired network-to-view mapping for all configured views.
///
/// # Errors
///
/// Returns the first [`PassAbort`] raised by a view. Views are visited in priority
/// order and nothing is written before this function returns.
pub async fn build_desired_state(
    views: &ViewSet,
    fetcher: &dyn NetworkListFetcher,
) -> Result<NetworkMap, PassAbort> {
    let mut assignments = Vec::new();

    for (name, view) in views.by_priority() {
        match collect_view_networks(name, view, fetcher).await {
            Ok(networks) => {
                assignments.extend(networks.into_iter().map(|network| (network, name)));
            }
            Err(abort) => {
                warn!(view = %name, reason = abort.kind(), "ABORT: {abort}");
                return Err(abort);
            }
        }
    }

    Ok(merge_assignments(assignments))
}

#[cfg(test)]
#[path = "desired_tests.rs"]
mod desired_tests;
