// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Network-to-view mapping operations of the PowerDNS management API.

use super::request::{endpoint_url, get_json, pdns_request};
use super::types::{NetworkEntry, NetworkList, SetNetworkViewRequest};
use crate::errors::ApiError;
use reqwest::{Client as HttpClient, Method};
use tracing::warn;

/// URL of a network with its prefix separator left as a literal `/`.
///
/// # Errors
///
/// Returns [`ApiError::InvalidUrl`] if `server_url` is not an absolute URL.
pub fn literal_network_url(server_url: &str, network: &str) -> Result<String, ApiError> {
    let segments: Vec<&str> = std::iter::once("networks")
        .chain(network.split('/'))
        .collect();
    endpoint_url(server_url, &segments)
}

/// URL of a network as a single path segment, with `/` sent as `%2F`.
///
/// # Errors
///
/// Returns [`ApiError::InvalidUrl`] if `server_url` is not an absolute URL.
pub fn encoded_network_url(server_url: &str, network: &str) -> Result<String, ApiError> {
    endpoint_url(server_url, &["networks", network])
}

/// List all network-to-view mappings.
///
/// # Errors
///
/// Returns an error if the request fails or the body is neither accepted shape.
pub async fn list_networks(
    client: &HttpClient,
    api_key: &str,
    server_url: &str,
) -> Result<Vec<NetworkEntry>, ApiError> {
    let url = endpoint_url(server_url, &["networks"])?;
    let list: NetworkList = get_json(client, api_key, &url).await?;
    Ok(list.into_entries())
}

/// Assign a network to a view (upsert keyed by CIDR).
///
/// The CIDR goes into the path literally first. Some deployments reject the raw
/// `/` with a client error; those get one more attempt with `%2F`.
///
/// # Errors
///
/// Returns the last error if the server rejects the assignment.
pub async fn set_network_view(
    client: &HttpClient,
    api_key: &str,
    server_url: &str,
    network: &str,
    view: &str,
) -> Result<(), ApiError> {
    let body = SetNetworkViewRequest { view };
    let literal_url = literal_network_url(server_url, network)?;

    match pdns_request(client, api_key, Method::PUT, &literal_url, Some(&body)).await {
        Ok(_) => Ok(()),
        Err(e) if e.is_client_error() && network.contains('/') => {
            warn!(
                network = %network,
                error = %e,
                "Literal network path rejected, retrying percent-encoded"
            );
            let encoded_url = encoded_network_url(server_url, network)?;
            pdns_request(client, api_key, Method::PUT, &encoded_url, Some(&body)).await?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}
