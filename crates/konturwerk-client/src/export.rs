// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client for the DXF export endpoint.
//
// The response body is a binary drawing. It is read as raw bytes and never
// decoded as text, so nothing is lost to charset conversion.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{info, instrument};

use konturwerk_core::error::{KonturwerkError, Result};
use konturwerk_core::types::{Contour, ExportArtifact};

use crate::http::{build_client, check_status, endpoint, network_error};
use crate::protocol::{EXPORT_ACCEPT, EXPORT_PATH, ExportRequest};

/// Sends contours to `POST {base}/export-dxf`.
#[derive(Debug, Clone)]
pub struct ExportClient {
    url: Url,
    http: reqwest::Client,
}

impl ExportClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: endpoint(base_url, EXPORT_PATH)?,
            http: build_client(timeout)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Convert a contour into a DXF drawing.
    ///
    /// The artifact always carries the standard download filename.
    #[instrument(skip(self, contour), fields(url = %self.url, points = contour.len()))]
    pub async fn export(
        &self,
        contour: &Contour,
        pixels_per_mm: f64,
        scale_factor: f64,
    ) -> Result<ExportArtifact> {
        let body = ExportRequest {
            contour,
            pixels_per_mm,
            scale_factor,
        };

        info!("sending export-dxf request");
        let response = self
            .http
            .post(self.url.clone())
            .header(ACCEPT, EXPORT_ACCEPT)
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error("export-dxf", e))?;

        let response = check_status("export-dxf", response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| network_error("export-dxf", e))?;

        if bytes.is_empty() {
            return Err(KonturwerkError::MalformedResponse(
                "export-dxf returned an empty body".into(),
            ));
        }

        info!(bytes = bytes.len(), content_type = %content_type, "drawing received");
        Ok(ExportArtifact::new(bytes.to_vec()))
    }
}
