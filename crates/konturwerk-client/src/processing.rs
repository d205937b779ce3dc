// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client for the contour-detection endpoint.

use std::time::Duration;

use reqwest::Url;
use tracing::{debug, info, instrument};

use konturwerk_core::error::{KonturwerkError, Result};
use konturwerk_core::params::ParameterSet;
use konturwerk_core::types::{Contour, ProcessedResult, Snapshot};

use crate::http::{build_client, check_status, endpoint, network_error};
use crate::protocol::{PROCESS_PATH, ProcessRequest, ProcessResponse};

/// Sends snapshots to `POST {base}/process-image`.
///
/// Repeating a call with the same inputs is safe; the client itself never
/// retries.
#[derive(Debug, Clone)]
pub struct ProcessingClient {
    url: Url,
    http: reqwest::Client,
}

impl ProcessingClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: endpoint(base_url, PROCESS_PATH)?,
            http: build_client(timeout)?,
        })
    }

    /// Full URL of the processing endpoint.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Run contour detection on a snapshot.
    #[instrument(skip_all, fields(url = %self.url, snapshot = %snapshot.id()))]
    pub async fn process(
        &self,
        snapshot: &Snapshot,
        params: &ParameterSet,
    ) -> Result<ProcessedResult> {
        let body = ProcessRequest {
            image: snapshot.to_base64(),
            params,
        };

        info!(
            bytes = snapshot.bytes().len(),
            format = ?snapshot.format(),
            threshold = params.threshold_value,
            "sending process-image request"
        );
        let response = self
            .http
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error("process-image", e))?;

        let response = check_status("process-image", response).await?;

        let raw = response
            .bytes()
            .await
            .map_err(|e| network_error("process-image", e))?;
        debug!(bytes = raw.len(), "received process-image response");

        let parsed: ProcessResponse = serde_json::from_slice(&raw).map_err(|e| {
            KonturwerkError::MalformedResponse(format!("process-image body is not JSON: {e}"))
        })?;

        let image = parsed.processed_image.ok_or_else(|| {
            KonturwerkError::MalformedResponse("process-image response missing processedImage".into())
        })?;
        let contour = parsed.contour.ok_or_else(|| {
            KonturwerkError::MalformedResponse("process-image response missing contour".into())
        })?;

        let result = ProcessedResult::new(image, Contour::from_value(contour)?)?;
        info!(points = result.contour().len(), "contour received");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn snapshot() -> Snapshot {
        Snapshot::from_data_url("data:image/jpeg;base64,/9j/AAEC").unwrap()
    }

    fn client(server: &MockServer) -> ProcessingClient {
        ProcessingClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn sends_image_and_all_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/process-image"))
            .and(body_partial_json(json!({
                "image": "/9j/AAEC",
                "thresholdValue": 245,
                "smoothingFactor": 0.001,
                "curvinessFactor": 100000,
                "pixelsPerMm": 1.0,
                "scaleFactor": 0.002,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "processedImage": "AAAA",
                "contour": [[0, 0], [10, 0], [10, 10]],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server)
            .process(&snapshot(), &ParameterSet::default())
            .await
            .unwrap();

        assert_eq!(result.image_base64(), "AAAA");
        assert_eq!(
            result.contour().as_value(),
            &json!([[0, 0], [10, 0], [10, 10]])
        );
    }

    #[tokio::test]
    async fn non_success_status_is_service_error_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/process-image"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "No contour detected"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .process(&snapshot(), &ParameterSet::default())
            .await
            .unwrap_err();

        match err {
            KonturwerkError::ServiceError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "No contour detected");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_contour_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"processedImage": "AAAA"})))
            .mount(&server)
            .await;

        let err = client(&server)
            .process(&snapshot(), &ParameterSet::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KonturwerkError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .process(&snapshot(), &ParameterSet::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KonturwerkError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn slow_service_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(json!({"processedImage": "AAAA", "contour": []})),
            )
            .mount(&server)
            .await;

        let client = ProcessingClient::new(&server.uri(), Duration::from_millis(100)).unwrap();
        let err = client
            .process(&snapshot(), &ParameterSet::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KonturwerkError::NetworkError(ref m) if m.contains("timed out")));
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        // Port 1 on loopback is never listening in CI.
        let client = ProcessingClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = client
            .process(&snapshot(), &ParameterSet::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KonturwerkError::NetworkError(_)));
    }
}
