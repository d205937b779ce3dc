// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use konturwerk_core::error::Result;
use konturwerk_core::types::{ExportArtifact, Snapshot};

/// Unified bridge that groups all native capabilities.
///
/// Platforms that lack a capability return
/// `KonturwerkError::PlatformUnavailable` or `DeviceUnavailable` from the
/// stub implementation.
pub trait PlatformBridge: CaptureSource + DownloadSink {
    /// Human-readable platform name (e.g. "Desktop (stub)").
    fn platform_name(&self) -> &str;
}

/// Produces a single still frame from a live camera feed.
///
/// Capturing has no side effects: the caller decides what to do with the
/// snapshot. Implementations never retry.
pub trait CaptureSource {
    /// Grab the current frame.
    ///
    /// Returns `Ok(None)` if the user cancelled (e.g. closed a picker).
    /// Fails with `KonturwerkError::DeviceUnavailable` if no camera stream is
    /// active.
    fn capture(&self) -> Result<Option<Snapshot>>;
}

/// Hands an exported drawing to the platform's download mechanism.
pub trait DownloadSink {
    /// Deliver the artifact's bytes under its suggested filename.
    ///
    /// Returns a description of where the file went (usually a path), or
    /// `Ok(None)` if the user cancelled a save dialog.
    fn deliver(&self, artifact: &ExportArtifact) -> Result<Option<String>>;
}

impl<T: CaptureSource + ?Sized> CaptureSource for &T {
    fn capture(&self) -> Result<Option<Snapshot>> {
        (**self).capture()
    }
}

impl<T: DownloadSink + ?Sized> DownloadSink for &T {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<Option<String>> {
        (**self).deliver(artifact)
    }
}

impl<T: DownloadSink + ?Sized> DownloadSink for Box<T> {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<Option<String>> {
        (**self).deliver(artifact)
    }
}
