// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Viewsync - PowerDNS View Synchronizer
//!
//! Viewsync keeps the network-to-view routing of a PowerDNS server in line with
//! a declarative YAML document. Each view names static CIDRs and/or a URL that
//! serves a plain-text list of CIDRs; higher-priority views win overlapping
//! networks.
//!
//! ## Overview
//!
//! Every pass re-reads the document, fetches remote lists, reads live state over
//! the PowerDNS HTTP API, diffs the two and applies idempotent mutations:
//!
//! - Create missing views
//! - Point networks at their desired view
//! - Reset unconfigured networks to `default` (managed-only mode)
//! - Remove unconfigured views and their zones (managed-only mode)
//!
//! A source that suddenly returns nothing, or a server whose state cannot be
//! read, aborts the pass before the first write.
//!
//! ## Modules
//!
//! - [`cli`] - Command-line and environment settings
//! - [`config`] - Views configuration document
//! - [`fetcher`] - Remote network-list fetching
//! - [`pdns`] - PowerDNS management API client
//! - [`reconciler`] - Desired/live diff and mutation apply
//! - [`scheduler`] - Fixed-interval pass runner
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use viewsync::config::parse_sync_config;
//!
//! let config = parse_sync_config(r"
//! managed_only: true
//! views:
//!   vpn:
//!     priority: 0
//!     networks: [10.1.0.0/16]
//!   aws:
//!     priority: 10
//!     url: https://lists.example.com/aws.txt
//! ").unwrap();
//!
//! assert_eq!(config.views.len(), 2);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod fetcher;
pub mod http_errors;
pub mod metrics;
pub mod pdns;
pub mod reconciler;
pub mod scheduler;
