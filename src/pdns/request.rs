// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Low-level request helper shared by all management API operations.

use crate::constants::API_KEY_HEADER;
use crate::errors::ApiError;
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};
use url::Url;

/// Build the API base URL from a configured address.
///
/// Adds `http://` when no scheme is given and strips trailing slashes, so
/// `"pdns:8081/api/v1/"` becomes `"http://pdns:8081/api/v1"`.
#[must_use]
pub fn build_api_url(server: &str) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        server.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", server.trim_end_matches('/'))
    }
}

/// Append path segments to the server URL, percent-encoding each one.
///
/// A segment is always exactly one path segment: `/`, `?`, `#` and `%` inside it
/// are encoded, so `"0/26.2.0.192.in-addr.arpa."` stays one segment.
///
/// # Errors
///
/// Returns [`ApiError::InvalidUrl`] if `server_url` is not an absolute URL.
pub fn endpoint_url(server_url: &str, segments: &[&str]) -> Result<String, ApiError> {
    let invalid = |reason: String| ApiError::InvalidUrl {
        url: server_url.to_string(),
        reason,
    };

    let mut url = Url::parse(server_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}

/// Execute a single request against the management API.
///
/// No retries: a failed call is reported to the caller, which decides whether it
/// aborts the pass or only the current mutation.
///
/// # Arguments
/// * `client` - HTTP client (its timeout bounds the call)
/// * `api_key` - Value of the `X-API-Key` header
/// * `method` - HTTP method
/// * `url` - Full URL of the endpoint
/// * `body` - Optional JSON body
///
/// # Errors
///
/// Returns [`ApiError::Transport`] if no response arrives and [`ApiError::Status`]
/// for non-2xx answers.
pub(crate) async fn pdns_request<T: Serialize + std::fmt::Debug>(
    client: &HttpClient,
    api_key: &str,
    method: Method,
    url: &str,
    body: Option<&T>,
) -> Result<String, ApiError> {
    debug!(
        method = %method,
        url = %url,
        body = ?body,
        "HTTP API request to PowerDNS"
    );

    let mut request = client
        .request(method.clone(), url)
        .header(API_KEY_HEADER, api_key);
    if let Some(body_data) = body {
        request = request.json(body_data);
    }

    let response = request.send().await.map_err(|e| ApiError::Transport {
        method: method.to_string(),
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!(
            method = %method,
            url = %url,
            status = %status,
            error = %error_text,
            "HTTP API request failed"
        );
        return Err(ApiError::Status {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            message: error_text,
        });
    }

    let text = response.text().await.map_err(|e| ApiError::Transport {
        method: method.to_string(),
        url: url.to_string(),
        reason: format!("failed to read response body: {e}"),
    })?;

    debug!(
        method = %method,
        url = %url,
        status = %status,
        response_len = text.len(),
        "HTTP API request successful"
    );

    Ok(text)
}

/// `GET` an endpoint and decode its JSON body.
///
/// # Errors
///
/// Returns the request error, or [`ApiError::Decode`] when the body is not the expected JSON.
pub(crate) async fn get_json<R: DeserializeOwned>(
    client: &HttpClient,
    api_key: &str,
    url: &str,
) -> Result<R, ApiError> {
    let text = pdns_request(client, api_key, Method::GET, url, None::<&()>).await?;

    serde_json::from_str(&text).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
