// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Konturwerk: platform bridge abstractions.
//
// The session controller only ever talks to a camera and a download target
// through the traits in `traits`. Concrete implementations live here (the
// stub and the directory download sink) or in the app crate (file-dialog
// capture on desktop).

pub mod downloads;
pub mod stub;
pub mod traits;

pub use downloads::DirectorySink;
pub use traits::{CaptureSource, DownloadSink, PlatformBridge};

/// Retrieves the bridge implementation for the target operating system.
///
/// Only the stub exists today: it reports every native capability as
/// unavailable so that callers fall back to desktop implementations.
pub fn platform_bridge() -> Box<dyn traits::PlatformBridge> {
    Box::new(stub::StubBridge)
}
