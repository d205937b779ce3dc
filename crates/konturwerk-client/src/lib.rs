// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Konturwerk Client: HTTP clients for the remote processing service.
//
// The service owns the actual image processing (edge detection, contour
// smoothing) and the DXF encoder. This crate only speaks its two endpoints:
//   - POST /process-image  (JSON in, JSON out)
//   - POST /export-dxf     (JSON in, binary DXF out)
//
// Neither client retries. Every retry is a fresh user action.

use std::future::Future;

use konturwerk_core::error::Result;
use konturwerk_core::params::ParameterSet;
use konturwerk_core::types::{Contour, ExportArtifact, ProcessedResult, Snapshot};

mod http;
pub mod export;
pub mod processing;
pub mod protocol;

pub use export::ExportClient;
pub use processing::ProcessingClient;

/// Anything that can turn a snapshot and parameters into a processed result.
pub trait ProcessingApi {
    fn process(
        &self,
        snapshot: &Snapshot,
        params: &ParameterSet,
    ) -> impl Future<Output = Result<ProcessedResult>> + Send;
}

/// Anything that can turn a contour into a downloadable drawing.
pub trait ExportApi {
    fn export(
        &self,
        contour: &Contour,
        pixels_per_mm: f64,
        scale_factor: f64,
    ) -> impl Future<Output = Result<ExportArtifact>> + Send;
}

impl ProcessingApi for ProcessingClient {
    fn process(
        &self,
        snapshot: &Snapshot,
        params: &ParameterSet,
    ) -> impl Future<Output = Result<ProcessedResult>> + Send {
        ProcessingClient::process(self, snapshot, params)
    }
}

impl ExportApi for ExportClient {
    fn export(
        &self,
        contour: &Contour,
        pixels_per_mm: f64,
        scale_factor: f64,
    ) -> impl Future<Output = Result<ExportArtifact>> + Send {
        ExportClient::export(self, contour, pixels_per_mm, scale_factor)
    }
}
