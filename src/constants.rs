// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the view synchronizer.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// View Constants
// ============================================================================

/// Name of the implicit fallback view.
///
/// It always exists on the server, is never created or deleted, and receives
/// every network that is not assigned elsewhere.
pub const DEFAULT_VIEW: &str = "default";

/// Prefix of the zone variant used to materialise a new view on the server
///
/// Creating a view posts `{"name": "..<view>"}`: the root zone variant for that view.
pub const VIEW_MARKER_ZONE_PREFIX: &str = "..";

// ============================================================================
// Management API Constants
// ============================================================================

/// Default PowerDNS management API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8081/api/v1";

/// Default PowerDNS server identifier in API paths
pub const DEFAULT_SERVER_ID: &str = "localhost";

/// Header carrying the management API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Default timeout for every outbound HTTP call (management API and remote lists)
pub const DEFAULT_HTTP_TIMEOUT_SECS: f64 = 60.0;

// ============================================================================
// Sync Loop Constants
// ============================================================================

/// Default path of the views configuration document
pub const DEFAULT_CONFIG_PATH: &str = "/config/views.yml";

/// Default interval between reconciliation passes (1 day)
pub const DEFAULT_SYNC_INTERVAL_SECS: f64 = 86_400.0;

/// Longest accepted interval or timeout (about 136 years)
pub const MAX_DURATION_SECS: f64 = u32::MAX as f64;

/// Exit code for fatal startup misconfiguration
pub const EXIT_CODE_MISCONFIGURED: i32 = 2;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 2;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";
