// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Periodic pass scheduling.
//!
//! The [`Scheduler`] runs one reconciliation pass immediately, then one more
//! each time the interval elapses after the previous pass finished. Each pass
//! runs in its own task, so an error or a panic is logged at the pass boundary
//! and the loop keeps going.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use viewsync::reconciler::ReconcileContext;
//! use viewsync::scheduler::Scheduler;
//!
//! # async fn example(ctx: ReconcileContext) {
//! let scheduler = Scheduler::new(Duration::from_secs(86_400));
//! scheduler.run(Arc::new(ctx), async {
//!     let _ = tokio::signal::ctrl_c().await;
//! }).await;
//! # }
//! ```

use crate::errors::PassAbort;
use crate::metrics;
use crate::reconciler::{reconcile_views, PassSummary, ReconcileContext};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Result of a pass that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The plan was applied (possibly with item failures, possibly empty)
    Applied(PassSummary),
    /// A safety check stopped the pass before any mutation
    Aborted(PassAbort),
}

/// Final status of a scheduled pass, used for logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    Applied,
    Aborted,
    /// The pass returned an error or panicked
    Failed,
}

impl PassStatus {
    /// Metric label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Aborted => "aborted",
            Self::Failed => "failed",
        }
    }
}

/// One unit of scheduled work.
#[async_trait]
pub trait ReconcilePass: Send + Sync + 'static {
    /// Run a single pass.
    ///
    /// # Errors
    ///
    /// Any error is treated as an unexpected pass failure by the scheduler.
    async fn run_pass(&self) -> anyhow::Result<PassOutcome>;
}

#[async_trait]
impl ReconcilePass for ReconcileContext {
    async fn run_pass(&self) -> anyhow::Result<PassOutcome> {
        Ok(match reconcile_views(self).await {
            Ok(summary) => PassOutcome::Applied(summary),
            Err(abort) => PassOutcome::Aborted(abort),
        })
    }
}

/// Fixed-interval pass runner.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    /// Create a scheduler that waits `interval` between passes.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Interval between the end of one pass and the start of the next.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Run passes until `shutdown` resolves. Returns the number of passes run.
    ///
    /// Shutdown is only observed between passes; a pass in flight always
    /// finishes.
    ///
    /// # Panics
    ///
    /// Panics if the interval is zero. Settings validation rejects that first.
    pub async fn run<P, S>(&self, pass: Arc<P>, shutdown: S) -> u64
    where
        P: ReconcilePass,
        S: Future<Output = ()>,
    {
        info!(
            interval_secs = self.interval.as_secs_f64(),
            "Starting view sync scheduler"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut passes = 0_u64;
        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!(passes, "Shutdown requested, stopping scheduler");
                    break;
                }
                _ = ticker.tick() => {}
            }

            run_once(Arc::clone(&pass)).await;
            passes += 1;
            ticker.reset();
        }

        passes
    }
}

/// Run a single pass in its own task and record how it ended.
pub async fn run_once<P: ReconcilePass>(pass: Arc<P>) -> PassStatus {
    let started = Instant::now();
    let handle = tokio::spawn(async move { pass.run_pass().await });

    let status = match handle.await {
        Ok(Ok(PassOutcome::Applied(summary))) => {
            info!(
                mutations = summary.mutations(),
                failures = summary.failures,
                "Pass complete"
            );
            PassStatus::Applied
        }
        Ok(Ok(PassOutcome::Aborted(abort))) => {
            warn!(reason = abort.kind(), error = %abort, "Pass aborted, no changes made");
            PassStatus::Aborted
        }
        Ok(Err(e)) => {
            error!(error = %e, "Pass failed");
            PassStatus::Failed
        }
        Err(join_error) => {
            error!(error = %join_error, "Pass panicked");
            PassStatus::Failed
        }
    };

    metrics::record_pass(status.as_str(), started.elapsed());
    status
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod scheduler_tests;
