// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the capture → process → export workflow.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{KonturwerkError, Result};

/// Suggested filename for every exported drawing.
pub const DEFAULT_EXPORT_FILENAME: &str = "contour_output.dxf";

/// Identity of one captured snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one stored contour.
///
/// A fresh id is minted every time a processing result is applied, so an
/// export issued against an older contour can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContourId(pub Uuid);

impl ContourId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContourId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContourId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encoding of an image payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Bmp,
    /// Payload whose encoding could not be recognised.
    Unknown,
}

impl ImageFormat {
    /// MIME type used in data URLs.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Sniff the format from the payload's magic bytes.
    pub fn detect(bytes: &[u8]) -> Self {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Jpeg) => Self::Jpeg,
            Ok(image::ImageFormat::Png) => Self::Png,
            Ok(image::ImageFormat::WebP) => Self::Webp,
            Ok(image::ImageFormat::Bmp) => Self::Bmp,
            _ => Self::Unknown,
        }
    }

    /// Infer the format from a MIME type (e.g. the header of a data URL).
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/png" => Self::Png,
            "image/webp" => Self::Webp,
            "image/bmp" => Self::Bmp,
            _ => Self::Unknown,
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "webp" => Self::Webp,
            "bmp" => Self::Bmp,
            _ => Self::Unknown,
        }
    }
}

/// Return the base64 payload of a data URL, or the input unchanged if it has
/// no `data:...,` prefix.
pub fn strip_data_url_prefix(data: &str) -> &str {
    match data.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((_, payload)) => payload,
        None => data,
    }
}

/// One still frame taken from the camera.
///
/// Snapshots are immutable. A later capture produces a new snapshot with a
/// new [`SnapshotId`]; it never mutates this one.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    id: SnapshotId,
    format: ImageFormat,
    bytes: Vec<u8>,
    captured_at: DateTime<Utc>,
}

impl Snapshot {
    /// Wrap an encoded frame, sniffing its format from the bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = ImageFormat::detect(&bytes);
        Self::with_format(bytes, format)
    }

    /// Wrap an encoded frame whose format is already known.
    pub fn with_format(bytes: Vec<u8>, format: ImageFormat) -> Result<Self> {
        if bytes.is_empty() {
            return Err(KonturwerkError::DeviceUnavailable(
                "camera produced an empty frame".into(),
            ));
        }
        Ok(Self {
            id: SnapshotId::new(),
            format,
            bytes,
            captured_at: Utc::now(),
        })
    }

    /// Decode a browser screenshot of the form `data:image/jpeg;base64,...`.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let (header, payload) = data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or_else(|| {
                KonturwerkError::DeviceUnavailable("camera frame is not a data URL".into())
            })?;

        let mime = header.strip_suffix(";base64").ok_or_else(|| {
            KonturwerkError::DeviceUnavailable("camera frame is not base64 encoded".into())
        })?;

        let bytes = STANDARD.decode(payload.trim()).map_err(|e| {
            KonturwerkError::DeviceUnavailable(format!("camera frame could not be decoded: {e}"))
        })?;

        let mut format = ImageFormat::from_mime(mime);
        if format == ImageFormat::Unknown {
            format = ImageFormat::detect(&bytes);
        }
        Self::with_format(bytes, format)
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Payload as plain base64, without any data-URL prefix.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Payload as a data URL, for previewing the raw capture.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.to_base64())
    }
}

/// A 2-D point in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Detected shape boundary, kept in the exact structure the service returned.
///
/// The export service is the only consumer that understands the structure,
/// so it is stored and echoed back verbatim. [`Contour::points`] offers a
/// best-effort decoded view for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contour(serde_json::Value);

impl Contour {
    /// Accept any non-null structure from the service.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Err(KonturwerkError::MalformedResponse("contour is null".into()));
        }
        Ok(Self(value))
    }

    /// Build a contour from plain points, encoded as `[[x, y], ...]`.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        Self(serde_json::Value::Array(
            points
                .iter()
                .map(|(x, y)| serde_json::json!([x, y]))
                .collect(),
        ))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Decode the contour into points.
    ///
    /// Understands both `[[x, y], ...]` and the nested `[[[x, y]], ...]` form.
    /// Returns `None` if the structure is anything else.
    pub fn points(&self) -> Option<Vec<Point>> {
        self.0.as_array()?.iter().map(decode_point).collect()
    }

    /// Number of top-level entries in the contour structure.
    pub fn len(&self) -> usize {
        self.0.as_array().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn decode_point(entry: &serde_json::Value) -> Option<Point> {
    let pair = entry.as_array()?;
    match pair.as_slice() {
        [x, y] if x.is_number() && y.is_number() => Some(Point {
            x: x.as_f64()?,
            y: y.as_f64()?,
        }),
        [inner] => decode_point(inner),
        _ => None,
    }
}

/// Output of a successful processing call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedResult {
    image_base64: String,
    image_format: ImageFormat,
    contour: Contour,
}

impl ProcessedResult {
    /// Validate the base64 preview image and pair it with its contour.
    ///
    /// The service encodes previews as JPEG; unrecognised payloads are
    /// labelled as JPEG for display.
    pub fn new(image_base64: String, contour: Contour) -> Result<Self> {
        let payload = strip_data_url_prefix(&image_base64).to_string();
        let bytes = STANDARD.decode(payload.trim()).map_err(|e| {
            KonturwerkError::MalformedResponse(format!("processedImage is not valid base64: {e}"))
        })?;
        let image_format = match ImageFormat::detect(&bytes) {
            ImageFormat::Unknown => ImageFormat::Jpeg,
            known => known,
        };
        Ok(Self {
            image_base64: payload.trim().to_string(),
            image_format,
            contour,
        })
    }

    pub fn image_base64(&self) -> &str {
        &self.image_base64
    }

    pub fn image_format(&self) -> ImageFormat {
        self.image_format
    }

    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    /// Preview image as a data URL ready for an `<img src>`.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.image_format.mime_type(),
            self.image_base64
        )
    }
}

/// A vector drawing returned by the export service, ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl ExportArtifact {
    /// Wrap export bytes under the standard download filename.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}
