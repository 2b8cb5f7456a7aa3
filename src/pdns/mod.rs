// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! PowerDNS management via its HTTP API.
//!
//! This module provides the client the reconciler uses to read and change a
//! server's view routing:
//!
//! - Listing views and the zones attached to them
//! - Creating and deleting views
//! - Listing and assigning network-to-view mappings
//! - Detaching and deleting zones during view cleanup
//!
//! # Architecture
//!
//! [`PdnsClient`] is built once at startup and handed to the reconciler as an
//! `Arc<dyn ViewApi>`. Every request carries the `X-API-Key` header and is bounded
//! by the HTTP client's timeout. Tests substitute their own [`ViewApi`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use viewsync::pdns::{PdnsClient, ViewApi};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PdnsClient::new(
//!     "http://localhost:8081/api/v1",
//!     "secret",
//!     "localhost",
//!     Duration::from_secs(60),
//! )?;
//!
//! let views = client.list_views().await?;
//! # Ok(())
//! # }
//! ```

pub mod networks;
pub mod request;
pub mod types;
pub mod views;

pub use request::build_api_url;
pub use types::NetworkEntry;

use crate::errors::ApiError;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;

/// Operations the reconciler needs from the DNS server.
///
/// Each call returns a typed result; callers decide whether a failure aborts the
/// pass or only the current item.
#[async_trait]
pub trait ViewApi: Send + Sync {
    /// Names of all views on the server.
    async fn list_views(&self) -> Result<Vec<String>, ApiError>;

    /// Zones attached to `view`, or `None` if the view does not exist.
    async fn view_zones(&self, view: &str) -> Result<Option<Vec<String>>, ApiError>;

    /// Create `view`.
    async fn create_view(&self, view: &str) -> Result<(), ApiError>;

    /// Delete `view`; a missing view is not an error.
    async fn delete_view(&self, view: &str) -> Result<(), ApiError>;

    /// All network-to-view mappings.
    async fn list_networks(&self) -> Result<Vec<NetworkEntry>, ApiError>;

    /// Assign `network` to `view`.
    async fn set_network_view(&self, network: &str, view: &str) -> Result<(), ApiError>;

    /// Detach `zone` from `view`.
    async fn detach_zone(&self, view: &str, zone: &str) -> Result<(), ApiError>;

    /// Delete `zone` from the server.
    async fn delete_zone(&self, zone: &str) -> Result<(), ApiError>;
}

/// Build the HTTP client shared by all outbound calls.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_http_client(timeout: Duration) -> Result<HttpClient, reqwest::Error> {
    HttpClient::builder()
        .timeout(timeout)
        .user_agent(concat!("viewsync/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Client for one PowerDNS server's management API.
#[derive(Debug, Clone)]
pub struct PdnsClient {
    /// HTTP client for API requests
    client: Arc<HttpClient>,
    /// Value of the `X-API-Key` header
    api_key: Arc<String>,
    /// `<base>/servers/<id>`
    server_url: String,
}

impl PdnsClient {
    /// Create a client with its own HTTP client bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_url: &str,
        api_key: &str,
        server_id: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::from_reqwest(
            api_url,
            api_key,
            server_id,
            build_http_client(timeout)?,
        ))
    }

    /// Create a client around an existing HTTP client.
    #[must_use]
    pub fn from_reqwest(api_url: &str, api_key: &str, server_id: &str, client: HttpClient) -> Self {
        Self {
            client: Arc::new(client),
            api_key: Arc::new(api_key.to_string()),
            server_url: format!("{}/servers/{server_id}", build_api_url(api_url)),
        }
    }

    /// `<base>/servers/<id>` prefix of every endpoint.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[async_trait]
impl ViewApi for PdnsClient {
    async fn list_views(&self) -> Result<Vec<String>, ApiError> {
        views::list_views(&self.client, &self.api_key, &self.server_url).await
    }

    async fn view_zones(&self, view: &str) -> Result<Option<Vec<String>>, ApiError> {
        views::view_zones(&self.client, &self.api_key, &self.server_url, view).await
    }

    async fn create_view(&self, view: &str) -> Result<(), ApiError> {
        views::create_view(&self.client, &self.api_key, &self.server_url, view).await
    }

    async fn delete_view(&self, view: &str) -> Result<(), ApiError> {
        views::delete_view(&self.client, &self.api_key, &self.server_url, view).await
    }

    async fn list_networks(&self) -> Result<Vec<NetworkEntry>, ApiError> {
        networks::list_networks(&self.client, &self.api_key, &self.server_url).await
    }

    async fn set_network_view(&self, network: &str, view: &str) -> Result<(), ApiError> {
        networks::set_network_view(&self.client, &self.api_key, &self.server_url, network, view)
            .await
    }

    async fn detach_zone(&self, view: &str, zone: &str) -> Result<(), ApiError> {
        views::detach_zone(&self.client, &self.api_key, &self.server_url, view, zone).await
    }

    async fn delete_zone(&self, zone: &str) -> Result<(), ApiError> {
        views::delete_zone(&self.client, &self.api_key, &self.server_url, zone).await
    }
}
