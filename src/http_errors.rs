// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP error code mapping to short failure reasons.
//!
//! Management API failures are logged and counted per mutation. This module turns
//! the HTTP status (or the lack of one) into a stable reason label so log lines and
//! metrics agree on how a failure is classified.
//!
//! # Usage
//!
//! ```rust
//! use viewsync::http_errors::map_http_error_to_reason;
//!
//! assert_eq!(map_http_error_to_reason(404), "NotFound");
//! assert_eq!(map_http_error_to_reason(500), "ServerError");
//! ```

use crate::errors::ApiError;

/// Request rejected as malformed
pub const REASON_BAD_REQUEST: &str = "BadRequest";
/// API key missing or rejected
pub const REASON_AUTH_FAILED: &str = "AuthFailed";
/// View, zone or network does not exist
pub const REASON_NOT_FOUND: &str = "NotFound";
/// Request well-formed but refused (e.g. invalid CIDR)
pub const REASON_UNPROCESSABLE: &str = "Unprocessable";
/// PowerDNS internal error
pub const REASON_SERVER_ERROR: &str = "ServerError";
/// Proxy or gateway in front of the API failed
pub const REASON_GATEWAY_ERROR: &str = "GatewayError";
/// No HTTP response at all
pub const REASON_UNREACHABLE: &str = "Unreachable";
/// Endpoint URL could not be built (bad server URL)
pub const REASON_INVALID_URL: &str = "InvalidUrl";
/// Response arrived but could not be decoded
pub const REASON_BAD_RESPONSE: &str = "BadResponse";

/// Map HTTP status code to failure reason.
///
/// # HTTP Code Mapping
///
/// | HTTP Code | Reason |
/// |-----------|--------|
/// | 400 | `BadRequest` |
/// | 401, 403 | `AuthFailed` |
/// | 404 | `NotFound` |
/// | 422 | `Unprocessable` |
/// | 500, 501 | `ServerError` |
/// | 502, 503, 504 | `GatewayError` |
/// | Other | `Unreachable` |
#[must_use]
pub const fn map_http_error_to_reason(status_code: u16) -> &'static str {
    match status_code {
        400 => REASON_BAD_REQUEST,
        401 | 403 => REASON_AUTH_FAILED,
        404 => REASON_NOT_FOUND,
        422 => REASON_UNPROCESSABLE,
        500 | 501 => REASON_SERVER_ERROR,
        502..=504 => REASON_GATEWAY_ERROR,
        _ => REASON_UNREACHABLE,
    }
}

/// Classify any [`ApiError`] into a reason label.
#[must_use]
pub fn reason_for(err: &ApiError) -> &'static str {
    match err {
        ApiError::Status { status, .. } => map_http_error_to_reason(*status),
        ApiError::Transport { .. } => REASON_UNREACHABLE,
        ApiError::InvalidUrl { .. } => REASON_INVALID_URL,
        ApiError::Decode { .. } => REASON_BAD_RESPONSE,
    }
}

#[cfg(test)]
#[path = "http_errors_tests.rs"]
mod http_errors_tests;
