// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where no native camera stream exists.

use konturwerk_core::error::{KonturwerkError, Result};
use konturwerk_core::types::{ExportArtifact, Snapshot};

use crate::traits::*;

/// No-op bridge returned on platforms without a native implementation.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl CaptureSource for StubBridge {
    fn capture(&self) -> Result<Option<Snapshot>> {
        tracing::warn!("CaptureSource::capture called on stub bridge");
        Err(KonturwerkError::DeviceUnavailable(
            "no camera stream on this platform".into(),
        ))
    }
}

impl DownloadSink for StubBridge {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<Option<String>> {
        tracing::warn!(filename = %artifact.filename, "DownloadSink::deliver called on stub bridge");
        Err(KonturwerkError::PlatformUnavailable)
    }
}
