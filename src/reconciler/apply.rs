// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Plan execution.
//!
//! Actions run one at a time, in plan order. A failed call is logged with its
//! network/view/zone and the next action proceeds; nothing is retried within the pass
//! because the next pass sees the same discrepancy and tries again.

use super::plan::Action;
use crate::constants::DEFAULT_VIEW;
use crate::errors::ApiError;
use crate::http_errors::reason_for;
use crate::metrics;
use crate::pdns::ViewApi;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Counters accumulated over one pass. Used for logging only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Planned actions issued, failed ones included
    pub attempted: usize,
    /// Views created successfully
    pub created_views: Vec<String>,
    /// Network assignments attempted, by target view
    pub updates: BTreeMap<String, usize>,
    /// Networks returned to `default`, by the view they left
    pub cleanups: BTreeMap<String, usize>,
    /// Views removed without any failed call
    pub deleted_views: Vec<String>,
    /// Calls that failed
    pub failures: usize,
}

impl PassSummary {
    /// Total number of planned mutations that were attempted.
    #[must_use]
    pub fn mutations(&self) -> usize {
        self.attempted
    }

    /// Emit the end-of-pass log lines.
    pub fn log(&self) {
        if !self.created_views.is_empty() {
            info!("Created views: {}", self.created_views.join(", "));
        }
        if !self.updates.is_empty() {
            info!("Updates: {}", format_counts(&self.updates));
        }
        if !self.cleanups.is_empty() {
            info!("Cleaned (to default): {}", format_counts(&self.cleanups));
        }
        if !self.deleted_views.is_empty() {
            info!("Dropped views: {}", self.deleted_views.join(", "));
        }
        if self.failures > 0 {
            warn!(failures = self.failures, "Some changes failed and will be retried next pass");
        }
    }
}

/// `"office: 1, vpn: 2"`, sorted by view.
#[must_use]
pub fn format_counts(counts: &BTreeMap<String, usize>) -> String {
    counts
        .iter()
        .map(|(view, count)| format!("{view}: {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Execute every action in order, collecting a summary.
pub async fn apply_plan(api: &dyn ViewApi, actions: &[Action]) -> PassSummary {
    let mut summary = PassSummary::default();

    for action in actions {
        summary.attempted += 1;
        let failures = match action {
            Action::CreateView { view } => {
                info!(view = %view, "Creating view");
                let failures = count_failure(action, api.create_view(view).await);
                if failures == 0 {
                    summary.created_views.push(view.clone());
                }
                failures
            }
            Action::SetNetwork {
                network,
                view,
                previous,
            } => {
                info!(
                    network = %network,
                    view = %view,
                    previous = previous.as_deref().unwrap_or("<unmapped>"),
                    "Updating network"
                );
                *summary.updates.entry(view.clone()).or_default() += 1;
                count_failure(action, api.set_network_view(network, view).await)
            }
            Action::ResetNetwork { network, previous } => {
                info!(network = %network, previous = %previous, "Resetting network to default");
                *summary.cleanups.entry(previous.clone()).or_default() += 1;
                count_failure(action, api.set_network_view(network, DEFAULT_VIEW).await)
            }
            Action::DeleteView { view } => {
                let failures = drop_view(api, view).await;
                if failures == 0 {
                    summary.deleted_views.push(view.clone());
                }
                failures
            }
        };
        summary.failures += failures;
    }

    summary
}

/// Remove a view: detach and delete each of its zones, then the view itself.
///
/// Returns the number of failed calls. A view that no longer exists is skipped.
pub async fn drop_view(api: &dyn ViewApi, view: &str) -> usize {
    info!(view = %view, "Dropping view");
    let action = Action::DeleteView {
        view: view.to_string(),
    };

    let zones = match api.view_zones(view).await {
        Ok(Some(zones)) => zones,
        Ok(None) => {
            info!(view = %view, "View already gone");
            return 0;
        }
        Err(e) => {
            error!(view = %view, error = %e, reason = reason_for(&e), "View drop failed: cannot list zones");
            metrics::record_mutation(action.kind(), false);
            return 1;
        }
    };

    let mut failures = 0;
    for zone in &zones {
        if let Err(e) = api.detach_zone(view, zone).await {
            error!(view = %view, zone = %zone, error = %e, reason = reason_for(&e), "Zone detach failed");
            failures += 1;
        }
        if let Err(e) = api.delete_zone(zone).await {
            error!(view = %view, zone = %zone, error = %e, reason = reason_for(&e), "Zone delete failed");
            failures += 1;
        }
    }

    failures += count_failure(&action, api.delete_view(view).await);
    failures
}

/// Log a failed call with its action context and return how many calls failed (0 or 1).
fn count_failure(action: &Action, result: Result<(), ApiError>) -> usize {
    match result {
        Ok(()) => {
            metrics::record_mutation(action.kind(), true);
            0
        }
        Err(e) => {
            error!(
                action = action.kind(),
                error = %e,
                reason = reason_for(&e),
                "Failed to {action}"
            );
            metrics::record_mutation(action.kind(), false);
            1
        }
    }
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod apply_tests;
