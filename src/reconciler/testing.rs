// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory fakes for reconciliation tests.
//!
//! [`FakeViewApi`] behaves like a small PowerDNS server: mutations change its
//! state, so a second pass observes the result of the first. Every call is
//! recorded as a label such as `"set_network 10.0.0.0/8 vpn"`.

use crate::constants::VIEW_MARKER_ZONE_PREFIX;
use crate::errors::ApiError;
use crate::fetcher::NetworkListFetcher;
use crate::pdns::{NetworkEntry, ViewApi};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

const READ_CALLS: [&str; 3] = ["list_views", "list_networks", "view_zones"];

#[derive(Default)]
struct FakeState {
    views: BTreeMap<String, Vec<String>>,
    networks: BTreeMap<String, String>,
    calls: Vec<String>,
    failing: BTreeSet<String>,
    fail_view_listing: bool,
    fail_network_listing: bool,
}

/// Recording, stateful [`ViewApi`].
#[derive(Default)]
pub struct FakeViewApi {
    state: Mutex<FakeState>,
}

impl FakeViewApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a live view with no zones.
    pub fn with_view(self, view: &str) -> Self {
        self.with_zones(view, &[])
    }

    /// Add a live view holding `zones`.
    pub fn with_zones(self, view: &str, zones: &[&str]) -> Self {
        self.state.lock().unwrap().views.insert(
            view.to_string(),
            zones.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Add a live network mapping.
    pub fn with_network(self, network: &str, view: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .networks
            .insert(network.to_string(), view.to_string());
        self
    }

    /// Make the call with this exact label fail with HTTP 500.
    pub fn failing(self, call: &str) -> Self {
        self.state.lock().unwrap().failing.insert(call.to_string());
        self
    }

    /// Make `list_views` fail.
    pub fn failing_view_listing(self) -> Self {
        self.state.lock().unwrap().fail_view_listing = true;
        self
    }

    /// Make `list_networks` fail.
    pub fn failing_network_listing(self) -> Self {
        self.state.lock().unwrap().fail_network_listing = true;
        self
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Only the write calls so far, in order.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| !READ_CALLS.iter().any(|read| call.starts_with(read)))
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Current network mappings.
    pub fn networks(&self) -> BTreeMap<String, String> {
        self.state.lock().unwrap().networks.clone()
    }

    /// Current view names (without the implicit `default`).
    pub fn views(&self) -> Vec<String> {
        self.state.lock().unwrap().views.keys().cloned().collect()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let fail = state.failing.contains(&call);
        state.calls.push(call.clone());
        if fail {
            return Err(ApiError::Status {
                method: "FAKE".to_string(),
                url: call,
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ViewApi for FakeViewApi {
    async fn list_views(&self) -> Result<Vec<String>, ApiError> {
        self.record("list_views".to_string())?;
        let state = self.state.lock().unwrap();
        if state.fail_view_listing {
            return Err(ApiError::Transport {
                method: "GET".to_string(),
                url: "fake://views".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(state.views.keys().cloned().collect())
    }

    async fn view_zones(&self, view: &str) -> Result<Option<Vec<String>>, ApiError> {
        self.record(format!("view_zones {view}"))?;
        Ok(self.state.lock().unwrap().views.get(view).cloned())
    }

    async fn create_view(&self, view: &str) -> Result<(), ApiError> {
        self.record(format!("create_view {view}"))?;
        self.state.lock().unwrap().views.insert(
            view.to_string(),
            vec![format!("{VIEW_MARKER_ZONE_PREFIX}{view}")],
        );
        Ok(())
    }

    async fn delete_view(&self, view: &str) -> Result<(), ApiError> {
        self.record(format!("delete_view {view}"))?;
        self.state.lock().unwrap().views.remove(view);
        Ok(())
    }

    async fn list_networks(&self) -> Result<Vec<NetworkEntry>, ApiError> {
        self.record("list_networks".to_string())?;
        let state = self.state.lock().unwrap();
        if state.fail_network_listing {
            return Err(ApiError::Status {
                method: "GET".to_string(),
                url: "fake://networks".to_string(),
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(state
            .networks
            .iter()
            .map(|(network, view)| NetworkEntry {
                network: network.clone(),
                view: Some(view.clone()),
            })
            .collect())
    }

    async fn set_network_view(&self, network: &str, view: &str) -> Result<(), ApiError> {
        self.record(format!("set_network {network} {view}"))?;
        self.state
            .lock()
            .unwrap()
            .networks
            .insert(network.to_string(), view.to_string());
        Ok(())
    }

    async fn detach_zone(&self, view: &str, zone: &str) -> Result<(), ApiError> {
        self.record(format!("detach_zone {view} {zone}"))?;
        if let Some(zones) = self.state.lock().unwrap().views.get_mut(view) {
            zones.retain(|existing| existing != zone);
        }
        Ok(())
    }

    async fn delete_zone(&self, zone: &str) -> Result<(), ApiError> {
        self.record(format!("delete_zone {zone}"))
    }
}

/// [`NetworkListFetcher`] serving canned lists; unknown URLs yield nothing.
#[derive(Default)]
pub struct FakeFetcher {
    lists: HashMap<String, Vec<String>>,
    fetched: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `networks` at `url`.
    pub fn with_list(mut self, url: &str, networks: &[&str]) -> Self {
        self.lists.insert(
            url.to_string(),
            networks.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// URLs fetched so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkListFetcher for FakeFetcher {
    async fn fetch_networks(&self, url: &str) -> Vec<String> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.lists.get(url).cloned().unwrap_or_default()
    }
}
