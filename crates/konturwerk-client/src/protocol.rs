// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wire format of the processing service.
//
//   POST /process-image
//     → { image, thresholdValue, smoothingFactor, curvinessFactor,
//         pixelsPerMm, scaleFactor }
//     ← { processedImage, contour }
//
//   POST /export-dxf
//     → { contour, pixelsPerMm, scaleFactor }
//     ← raw DXF bytes
//
// Failures come back as a non-2xx status, usually with `{ "error": "..." }`.

use serde::{Deserialize, Serialize};

use konturwerk_core::error::KonturwerkError;
use konturwerk_core::params::ParameterSet;
use konturwerk_core::types::Contour;

pub const PROCESS_PATH: &str = "/process-image";
pub const EXPORT_PATH: &str = "/export-dxf";

/// Media types offered in the export request's `Accept` header.
pub const EXPORT_ACCEPT: &str = "application/dxf, application/octet-stream;q=0.9, */*;q=0.1";

/// Body of a processing request.
#[derive(Debug, Serialize)]
pub struct ProcessRequest<'a> {
    /// Base64 image payload without any data-URL prefix.
    pub image: String,
    #[serde(flatten)]
    pub params: &'a ParameterSet,
}

/// Body of a processing response. Fields are optional so that a missing
/// field surfaces as `MalformedResponse` rather than a serde error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub processed_image: Option<String>,
    pub contour: Option<serde_json::Value>,
}

/// Body of an export request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest<'a> {
    pub contour: &'a Contour,
    pub pixels_per_mm: f64,
    pub scale_factor: f64,
}

/// Build a `ServiceError` from a failed response.
///
/// Prefers the service's `error` (or `message`) JSON field, then the raw
/// body, then the status line's reason phrase.
pub fn service_error(status: u16, reason: Option<&str>, body: &str) -> KonturwerkError {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|key| v.get(key).and_then(|m| m.as_str()).map(str::to_owned))
        });

    let message = match from_json {
        Some(msg) => msg,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => reason.unwrap_or("request failed").to_string(),
    };

    KonturwerkError::ServiceError { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_request_flattens_parameters() {
        let params = ParameterSet::default();
        let req = ProcessRequest {
            image: "QUJD".into(),
            params: &params,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "image": "QUJD",
                "thresholdValue": 245,
                "smoothingFactor": 0.001,
                "curvinessFactor": 100000,
                "pixelsPerMm": 1.0,
                "scaleFactor": 0.002,
            })
        );
    }

    #[test]
    fn export_request_echoes_contour_verbatim() {
        let contour = Contour::from_value(serde_json::json!([[[1, 2]], [[3, 4]]])).unwrap();
        let req = ExportRequest {
            contour: &contour,
            pixels_per_mm: 1.0,
            scale_factor: 0.002,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contour"], serde_json::json!([[[1, 2]], [[3, 4]]]));
        assert_eq!(json["pixelsPerMm"], 1.0);
        assert_eq!(json["scaleFactor"], 0.002);
    }

    #[test]
    fn service_error_prefers_json_error_field() {
        let err = service_error(400, Some("Bad Request"), r#"{"error": "No contour detected"}"#);
        match err {
            KonturwerkError::ServiceError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "No contour detected");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn service_error_falls_back_to_body_then_reason() {
        let err = service_error(502, Some("Bad Gateway"), "  upstream down \n");
        assert!(matches!(err, KonturwerkError::ServiceError { ref message, .. } if message == "upstream down"));

        let err = service_error(500, Some("Internal Server Error"), "");
        assert!(matches!(err, KonturwerkError::ServiceError { ref message, .. } if message == "Internal Server Error"));
    }
}
