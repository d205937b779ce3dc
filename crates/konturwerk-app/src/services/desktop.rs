// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge: file dialogs stand in for the camera and the browser's
// download prompt.

use std::path::PathBuf;

use tracing::info;

use konturwerk_bridge::{CaptureSource, DirectorySink, DownloadSink, PlatformBridge};
use konturwerk_core::error::Result;
use konturwerk_core::types::{ExportArtifact, ImageFormat, Snapshot};

/// Image types offered by the capture picker.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

/// Where exported drawings go.
#[derive(Debug, Clone)]
pub enum DownloadTarget {
    /// Written straight into a directory, never overwriting.
    Directory(DirectorySink),
    /// A save dialog for every export, pre-filled with the artifact name.
    AskEachTime,
}

/// Bridge used on desktop builds.
#[derive(Debug, Clone)]
pub struct DesktopBridge {
    target: DownloadTarget,
}

impl DesktopBridge {
    pub fn new(target: DownloadTarget) -> Self {
        Self { target }
    }
}

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop"
    }
}

impl CaptureSource for DesktopBridge {
    fn capture(&self) -> Result<Option<Snapshot>> {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Capture image")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return Ok(None);
        };

        let bytes = std::fs::read(&path)?;
        let mut format = ImageFormat::detect(&bytes);
        if format == ImageFormat::Unknown
            && let Some(ext) = path.extension()
        {
            format = ImageFormat::from_extension(&ext.to_string_lossy());
        }
        let snapshot = Snapshot::with_format(bytes, format)?;
        info!(path = %path.display(), format = ?snapshot.format(), "image captured");
        Ok(Some(snapshot))
    }
}

impl DownloadSink for DesktopBridge {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<Option<String>> {
        match &self.target {
            DownloadTarget::Directory(sink) => sink.deliver(artifact),
            DownloadTarget::AskEachTime => {
                let Some(path) = save_dialog(&artifact.filename) else {
                    info!("save dialog cancelled");
                    return Ok(None);
                };
                std::fs::write(&path, &artifact.bytes)?;
                info!(path = %path.display(), bytes = artifact.bytes.len(), "drawing saved");
                Ok(Some(path.display().to_string()))
            }
        }
    }
}

fn save_dialog(filename: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Save drawing")
        .set_file_name(filename)
        .add_filter("DXF drawing", &["dxf"])
        .save_file()
}
