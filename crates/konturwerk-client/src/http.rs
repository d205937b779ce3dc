// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared HTTP plumbing for both clients: endpoint construction, the reqwest
// client, and mapping transport failures into the error taxonomy.

use std::time::Duration;

use reqwest::{Response, Url};
use tracing::error;

use konturwerk_core::error::{KonturwerkError, Result};

use crate::protocol::service_error;

/// Join a service base URL and an endpoint path, validating the result.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url> {
    let joined = format!("{}{}", base_url.trim().trim_end_matches('/'), path);
    let url = Url::parse(&joined)
        .map_err(|e| KonturwerkError::Config(format!("invalid service URL '{base_url}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(KonturwerkError::Config(format!(
            "unsupported scheme '{other}' in service URL '{base_url}'"
        ))),
    }
}

/// Build a reqwest client with the given per-request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| KonturwerkError::Config(format!("HTTP client setup failed: {e}")))
}

/// Map a failure that happened before a complete response arrived.
pub(crate) fn network_error(context: &str, err: reqwest::Error) -> KonturwerkError {
    let err = err.without_url();
    if err.is_timeout() {
        KonturwerkError::NetworkError(format!("{context}: request timed out"))
    } else if err.is_connect() {
        KonturwerkError::NetworkError(format!("{context}: connection failed: {err}"))
    } else {
        KonturwerkError::NetworkError(format!("{context}: {err}"))
    }
}

/// Pass successful responses through; turn anything else into a
/// `ServiceError` carrying the service's own message.
pub(crate) async fn check_status(context: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = service_error(status.as_u16(), status.canonical_reason(), &body);
    error!(status = status.as_u16(), error = %err, "{context} failed");
    Err(err)
}
