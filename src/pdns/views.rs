// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! View and zone operations of the PowerDNS management API.

use super::request::{endpoint_url, get_json, pdns_request};
use super::types::{CreateViewRequest, ViewDetails, ViewList};
use crate::constants::VIEW_MARKER_ZONE_PREFIX;
use crate::errors::ApiError;
use reqwest::{Client as HttpClient, Method};
use tracing::{debug, info};

/// List the names of all views known to the server.
///
/// # Errors
///
/// Returns an error if the request fails or the body is not a view list.
pub async fn list_views(
    client: &HttpClient,
    api_key: &str,
    server_url: &str,
) -> Result<Vec<String>, ApiError> {
    let url = endpoint_url(server_url, &["views"])?;
    let list: ViewList = get_json(client, api_key, &url).await?;
    Ok(list.views)
}

/// Get the zones attached to a view.
///
/// Returns `Ok(None)` when the view does not exist (HTTP 404).
///
/// # Errors
///
/// Returns an error for any other failure.
pub async fn view_zones(
    client: &HttpClient,
    api_key: &str,
    server_url: &str,
    view: &str,
) -> Result<Option<Vec<String>>, ApiError> {
    let url = endpoint_url(server_url, &["views", view])?;

    match get_json::<ViewDetails>(client, api_key, &url).await {
        Ok(details) => Ok(Some(details.zones)),
        Err(e) if e.is_not_found() => {
            debug!(view = %view, "View not found, nothing attached");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Create a view by attaching its root-zone marker variant.
///
/// # Errors
///
/// Returns an error if the server rejects the request.
pub async fn create_view(
    client: &HttpClient,
    api_key: &str,
    server_url: &str,
    view: &str,
) -> Result<(), ApiError> {
    let url = endpoint_url(server_url, &["views", view])?;
    let body = CreateViewRequest {
        name: format!("{VIEW_MARKER_ZONE_PREFIX}{view}"),
    };

    pdns_request(client, api_key, Method::POST, &url, Some(&body)).await?;
    info!(view = %view, "Created view");
    Ok(())
}

/// Delete a view.
///
/// Idempotent: a view that is already gone (404) is not an error. Servers that
/// drop empty views on their own and refuse the explicit call (405) are treated
/// the same way.
///
/// # Errors
///
/// Returns an error for any other failure.
pub async fn delete_view(
    client: &HttpClient,
    api_key: &str,
    server_url: &str,
    view: &str,
) -> Result<(), ApiError> {
    let url = endpoint_url(server_url, &["views", view])?;

    match pdns_request(client, api_key, Method::DELETE, &url, None::<&()>).await {
        Ok(_) => Ok(()),
        Err(e) if matches!(e.status_code(), Some(404 | 405)) => {
            debug!(view = %view, error = %e, "View already gone");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Detach a zone variant from a view.
///
/// # Errors
///
/// Returns an error if the server rejects the request.
pub async fn detach_zone(
    client: &HttpClient,
    api_key: &str,
    server_url: &str,
    view: &str,
    zone: &str,
) -> Result<(), ApiError> {
    let url = endpoint_url(server_url, &["views", view, zone])?;
    pdns_request(client, api_key, Method::DELETE, &url, None::<&()>).await?;
    Ok(())
}

/// Delete a zone outright.
///
/// # Errors
///
/// Returns an error if the server rejects the request.
pub async fn delete_zone(
    client: &HttpClient,
    api_key: &str,
    server_url: &str,
    zone: &str,
) -> Result<(), ApiError> {
    let url = endpoint_url(server_url, &["zones", zone])?;
    pdns_request(client, api_key, Method::DELETE, &url, None::<&()>).await?;
    Ok(())
}
