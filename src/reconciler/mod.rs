// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! View reconciliation.
//!
//! One pass brings the server's network-to-view routing in line with the views
//! configuration document.
//!
//! # Reconciliation Pass
//!
//! 1. **Load** - Re-read the configuration document
//! 2. **Desired** - Build the network-to-view mapping, fetching remote lists
//!    ([`desired`])
//! 3. **Live** - Read views and network mappings from the server ([`live`])
//! 4. **Plan** - Diff desired against live ([`plan`])
//! 5. **Apply** - Issue each mutation, logging failures individually ([`apply`])
//!
//! Steps 1-3 can abort the pass. An abort always happens before the first write,
//! so a broken list source or an unreadable server never changes routing.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use viewsync::fetcher::HttpListFetcher;
//! use viewsync::pdns::{build_http_client, PdnsClient};
//! use viewsync::reconciler::{reconcile_views, ReconcileContext};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let timeout = Duration::from_secs(60);
//! let ctx = ReconcileContext::new(
//!     Arc::new(PdnsClient::new("http://localhost:8081/api/v1", "secret", "localhost", timeout)?),
//!     Arc::new(HttpListFetcher::new(build_http_client(timeout)?)),
//!     "/config/views.yml",
//! );
//!
//! match reconcile_views(&ctx).await {
//!     Ok(summary) => println!("{} changes", summary.mutations()),
//!     Err(abort) => println!("skipped: {abort}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod apply;
pub mod desired;
pub mod live;
pub mod plan;

#[cfg(test)]
pub(crate) mod testing;

pub use apply::{apply_plan, PassSummary};
pub use desired::{build_desired_state, merge_assignments};
pub use live::{read_live_state, LiveState};
pub use plan::{plan_actions, Action};

use crate::config::{load_sync_config, SyncConfig};
use crate::errors::PassAbort;
use crate::fetcher::NetworkListFetcher;
use crate::metrics;
use crate::pdns::ViewApi;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Network CIDR to view name.
pub type NetworkMap = BTreeMap<String, String>;

/// Collaborators of a reconciliation pass, built once at startup.
#[derive(Clone)]
pub struct ReconcileContext {
    /// Management API of the server being reconciled
    pub api: Arc<dyn ViewApi>,
    /// Remote network-list source
    pub fetcher: Arc<dyn NetworkListFetcher>,
    /// Views configuration document, re-read every pass
    pub config_path: PathBuf,
}

impl ReconcileContext {
    /// Bundle the pass collaborators.
    pub fn new(
        api: Arc<dyn ViewApi>,
        fetcher: Arc<dyn NetworkListFetcher>,
        config_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api,
            fetcher,
            config_path: config_path.into(),
        }
    }
}

/// Run one full pass: load the configuration document, then reconcile it.
///
/// # Errors
///
/// Returns a [`PassAbort`] if the document is missing or invalid, or if any
/// abort condition of [`reconcile_config`] triggers. No mutation is issued then.
pub async fn reconcile_views(ctx: &ReconcileContext) -> Result<PassSummary, PassAbort> {
    let config = load_sync_config(&ctx.config_path).await.map_err(|e| {
        warn!(path = %ctx.config_path.display(), error = %e, "Configuration unavailable");
        PassAbort::from(e)
    })?;

    reconcile_config(ctx, &config).await
}

/// Reconcile the server against an already-loaded configuration.
///
/// # Errors
///
/// Returns a [`PassAbort`] when a remote list or view is empty, or when live state
/// cannot be read. All aborts happen before the first mutation.
pub async fn reconcile_config(
    ctx: &ReconcileContext,
    config: &SyncConfig,
) -> Result<PassSummary, PassAbort> {
    debug!(
        views = config.views.len(),
        managed_only = config.managed_only,
        "Starting reconciliation pass"
    );

    let desired = build_desired_state(&config.views, ctx.fetcher.as_ref()).await?;
    let live = read_live_state(ctx.api.as_ref()).await?;
    metrics::set_network_counts(desired.len(), live.networks.len());

    let actions = plan_actions(&config.views, config.managed_only, &desired, &live);
    if actions.is_empty() {
        info!(networks = desired.len(), "Views in sync, nothing to do");
        return Ok(PassSummary::default());
    }

    info!(actions = actions.len(), "Applying view changes");
    let summary = apply_plan(ctx.api.as_ref(), &actions).await;
    summary.log();
    Ok(summary)
}
