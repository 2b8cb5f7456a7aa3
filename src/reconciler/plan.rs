// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired-vs-live diff.
//!
//! The diff is a pure function producing an ordered list of [`Action`]s: views
//! first, so no network is pointed at a view that does not exist yet, then network
//! updates, then (only in managed mode) cleanup.

use super::live::LiveState;
use super::NetworkMap;
use crate::config::ViewSet;
use crate::constants::DEFAULT_VIEW;
use std::fmt;

/// A single mutation against the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a configured view missing on the server
    CreateView {
        /// View to create
        view: String,
    },
    /// Point a network at its desired view
    SetNetwork {
        /// CIDR
        network: String,
        /// Desired view
        view: String,
        /// Current live view, if the network is mapped at all
        previous: Option<String>,
    },
    /// Return an unconfigured network to `default`
    ResetNetwork {
        /// CIDR
        network: String,
        /// View the network is leaving
        previous: String,
    },
    /// Remove an unconfigured view together with its zones
    DeleteView {
        /// View to delete
        view: String,
    },
}

impl Action {
    /// Short, stable label for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateView { .. } => "create_view",
            Self::SetNetwork { .. } => "set_network",
            Self::ResetNetwork { .. } => "reset_network",
            Self::DeleteView { .. } => "delete_view",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateView { view } => write!(f, "create view {view}"),
            Self::SetNetwork { network, view, .. } => write!(f, "set {network} -> {view}"),
            Self::ResetNetwork { network, .. } => write!(f, "reset {network} -> {DEFAULT_VIEW}"),
            Self::DeleteView { view } => write!(f, "delete view {view}"),
        }
    }
}

/// Compute the minimal ordered set of mutations.
///
/// 1. Create configured views (except `default`) absent live, in priority order.
/// 2. Set every desired network whose live view differs or is missing.
/// 3. With `managed_only`: reset live networks on non-default views that are no
///    longer desired, then delete live views (except `default`) that are no longer
///    configured.
#[must_use]
pub fn plan_actions(
    views: &ViewSet,
    managed_only: bool,
    desired: &NetworkMap,
    live: &LiveState,
) -> Vec<Action> {
    let mut actions = Vec::new();

    for (view, _) in views.by_priority() {
        if view != DEFAULT_VIEW && !live.views.contains(view) {
            actions.push(Action::CreateView {
                view: view.to_string(),
            });
        }
    }

    for (network, view) in desired {
        let current = live.networks.get(network);
        if current != Some(view) {
            actions.push(Action::SetNetwork {
                network: network.clone(),
                view: view.clone(),
                previous: current.cloned(),
            });
        }
    }

    if managed_only {
        for (network, view) in &live.networks {
            if view != DEFAULT_VIEW && !desired.contains_key(network) {
                actions.push(Action::ResetNetwork {
                    network: network.clone(),
                    previous: view.clone(),
                });
            }
        }

        for view in &live.views {
            if view != DEFAULT_VIEW && !views.contains(view) {
                actions.push(Action::DeleteView { view: view.clone() });
            }
        }
    }

    actions
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod plan_tests;
