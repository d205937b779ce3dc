// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end workflow against a mock processing service: capture, process,
// export and download through the real HTTP clients.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use konturwerk_bridge::DirectorySink;
use konturwerk_client::{ExportClient, ProcessingClient};
use konturwerk_core::error::KonturwerkError;
use konturwerk_core::types::Snapshot;
use konturwerk_session::{Outcome, SessionController, SessionState};

fn clients(server: &MockServer) -> (ProcessingClient, ExportClient) {
    let timeout = Duration::from_secs(5);
    (
        ProcessingClient::new(&server.uri(), timeout).unwrap(),
        ExportClient::new(&server.uri(), timeout).unwrap(),
    )
}

#[tokio::test]
async fn capture_process_export_download() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process-image"))
        .and(body_partial_json(json!({
            "image": "/9j/4AAQ",
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

    let dxf = b"0\nSECTION\n2\nENTITIES\n0\nLWPOLYLINE\n0\nENDSEC\n0\nEOF\n".to_vec();
    Mock::given(method("POST"))
        .and(path("/export-dxf"))
        .and(body_partial_json(json!({
            "contour": [[0, 0], [10, 0], [10, 10]],
            "pixelsPerMm": 1.0,
            "scaleFactor": 0.002,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(dxf.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let (processing, export) = clients(&server);
    let downloads = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(downloads.path());

    let mut session = SessionController::default();
    session.on_capture(Snapshot::from_data_url("data:image/jpeg;base64,/9j/4AAQ").unwrap());
    assert_eq!(session.state(), SessionState::Captured);

    assert_eq!(session.on_process_requested(&processing).await, Outcome::Applied);
    assert_eq!(session.state(), SessionState::Processed);
    assert_eq!(
        session.contour().unwrap().as_value(),
        &json!([[0, 0], [10, 0], [10, 10]])
    );

    assert_eq!(session.on_export_requested(&export, &sink).await, Outcome::Applied);
    assert_eq!(session.state(), SessionState::Processed);

    let written = std::fs::read(downloads.path().join("contour_output.dxf")).unwrap();
    assert_eq!(written, dxf);
}

#[tokio::test]
async fn http_failure_leaves_session_captured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process-image"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "No contour detected"})))
        .mount(&server)
        .await;

    let (processing, _) = clients(&server);
    let mut session = SessionController::default();
    session.on_capture(Snapshot::from_bytes(vec![0xFF, 0xD8, 0xFF]).unwrap());

    assert_eq!(session.on_process_requested(&processing).await, Outcome::Failed);
    assert_eq!(session.state(), SessionState::Captured);
    assert!(session.processed().is_none());
    match session.error() {
        Some(KonturwerkError::ServiceError { message, .. }) => {
            assert_eq!(message, "No contour detected")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn nothing_is_sent_before_a_capture() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (processing, export) = clients(&server);
    let downloads = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(downloads.path());
    let mut session = SessionController::default();

    assert_eq!(session.on_process_requested(&processing).await, Outcome::Ignored);
    assert_eq!(session.on_export_requested(&export, &sink).await, Outcome::Ignored);
}
