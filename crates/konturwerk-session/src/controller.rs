// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session state machine.
//
//   Idle ──capture──▶ Captured ──process──▶ Processed ──export──▶ Exporting
//    ▲                   ▲  ▲                  │  ▲                  │
//    └──────discard──────┘  └────capture───────┘  └────done/failed───┘
//
// Every transition is user-triggered. Remote calls are tagged with the
// identity they were issued against (snapshot id + request generation for
// processing, contour id for export); a result whose tag no longer matches
// the current state is dropped without touching anything.

use tracing::{debug, info, warn};

use konturwerk_bridge::traits::{CaptureSource, DownloadSink};
use konturwerk_client::{ExportApi, ProcessingApi};
use konturwerk_core::error::{KonturwerkError, Result};
use konturwerk_core::params::{ParameterSet, ParameterStore};
use konturwerk_core::types::{
    Contour, ContourId, ExportArtifact, ProcessedResult, Snapshot, SnapshotId,
};

use crate::view::SessionView;

/// Workflow state, derived from what the session currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No snapshot.
    Idle,
    /// Snapshot present, nothing processed for it yet.
    Captured,
    /// Processed result present.
    Processed,
    /// Processed, with an export call in flight.
    Exporting,
}

/// What happened when an action or a remote result reached the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action was not valid in the current state; nothing was done and no
    /// network call was made.
    Ignored,
    /// The state changed as requested.
    Applied,
    /// The call failed; the error is surfaced and the state is as it was
    /// before the call.
    Failed,
    /// The result belonged to a superseded snapshot or contour and was
    /// discarded.
    Stale,
}

/// A processing call issued against one snapshot.
#[derive(Debug, Clone)]
pub struct ProcessTicket {
    snapshot: Snapshot,
    params: ParameterSet,
    generation: u64,
}

impl ProcessTicket {
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn snapshot_id(&self) -> SnapshotId {
        self.snapshot.id()
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }
}

/// An export call issued against one contour.
#[derive(Debug, Clone)]
pub struct ExportTicket {
    contour_id: ContourId,
    contour: Contour,
    pixels_per_mm: f64,
    scale_factor: f64,
}

impl ExportTicket {
    pub fn contour_id(&self) -> ContourId {
        self.contour_id
    }

    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    pub fn pixels_per_mm(&self) -> f64 {
        self.pixels_per_mm
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

#[derive(Debug)]
struct StoredResult {
    id: ContourId,
    result: ProcessedResult,
}

/// Owns the session: snapshot, parameters, latest result, surfaced error.
#[derive(Debug, Default)]
pub struct SessionController {
    params: ParameterStore,
    snapshot: Option<Snapshot>,
    processed: Option<StoredResult>,
    /// Generation of the newest processing request; older tickets are stale.
    process_generation: u64,
    process_in_flight: bool,
    export_in_flight: Option<ContourId>,
    error: Option<KonturwerkError>,
    last_download: Option<String>,
}

impl SessionController {
    pub fn new(params: ParameterStore) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    // -- Queries -------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        match (&self.snapshot, &self.processed, self.export_in_flight) {
            (None, _, _) => SessionState::Idle,
            (Some(_), None, _) => SessionState::Captured,
            (Some(_), Some(_), None) => SessionState::Processed,
            (Some(_), Some(_), Some(_)) => SessionState::Exporting,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn processed(&self) -> Option<&ProcessedResult> {
        self.processed.as_ref().map(|s| &s.result)
    }

    pub fn contour(&self) -> Option<&Contour> {
        self.processed().map(ProcessedResult::contour)
    }

    pub fn parameters(&self) -> ParameterSet {
        self.params.get()
    }

    /// The most recent remote or capture error, until dismissed or superseded.
    pub fn error(&self) -> Option<&KonturwerkError> {
        self.error.as_ref()
    }

    /// Where the last successful export was delivered.
    pub fn last_download(&self) -> Option<&str> {
        self.last_download.as_deref()
    }

    /// Whether a processing call is outstanding.
    pub fn is_processing(&self) -> bool {
        self.process_in_flight
    }

    /// Snapshot of everything the presentation layer shows.
    pub fn view(&self) -> SessionView {
        SessionView::from_controller(self)
    }

    // -- Capture -------------------------------------------------------------

    /// Store a new snapshot. Valid from any state; always ends in `Captured`.
    ///
    /// Drops any processed result and orphans in-flight calls, whose results
    /// will be discarded as stale.
    pub fn on_capture(&mut self, snapshot: Snapshot) {
        info!(
            snapshot = %snapshot.id(),
            bytes = snapshot.bytes().len(),
            format = ?snapshot.format(),
            captured_at = %snapshot.captured_at(),
            "snapshot captured"
        );
        self.snapshot = Some(snapshot);
        self.clear_downstream();
        self.error = None;
    }

    /// Ask a capture source for a frame and store it.
    ///
    /// A cancelled capture is `Ignored`; a camera failure is surfaced and
    /// leaves the session untouched.
    pub fn capture_from(&mut self, source: &impl CaptureSource) -> Outcome {
        match source.capture() {
            Ok(Some(snapshot)) => {
                self.on_capture(snapshot);
                Outcome::Applied
            }
            Ok(None) => {
                debug!("capture cancelled");
                Outcome::Ignored
            }
            Err(e) => {
                warn!(error = %e, "capture failed");
                self.error = Some(e);
                Outcome::Failed
            }
        }
    }

    /// Throw away the snapshot and everything derived from it.
    pub fn on_discard(&mut self) {
        if self.snapshot.take().is_some() {
            info!("snapshot discarded");
        }
        self.clear_downstream();
        self.error = None;
    }

    fn clear_downstream(&mut self) {
        // Tickets issued before this point must never apply.
        self.process_generation += 1;
        self.processed = None;
        self.process_in_flight = false;
        self.export_in_flight = None;
    }

    // -- Parameters ----------------------------------------------------------

    /// Write a raw form value into the parameter store.
    ///
    /// Rejected writes keep the previous value. Parameter errors are returned
    /// to the caller but never replace the surfaced remote error.
    pub fn on_set_parameter(&mut self, name: &str, raw: &str) -> Result<ParameterSet> {
        self.params.set(name, raw).inspect_err(|e| {
            debug!(parameter = name, value = raw, error = %e, "parameter write rejected");
        })
    }

    /// Restore default parameter values.
    pub fn reset_parameters(&mut self) -> ParameterSet {
        self.params.reset()
    }

    // -- Processing ----------------------------------------------------------

    /// Start a processing call for the current snapshot.
    ///
    /// Returns `None` in `Idle`; no call should be made then.
    pub fn begin_process(&mut self) -> Option<ProcessTicket> {
        let Some(snapshot) = self.snapshot.clone() else {
            debug!("process requested without a snapshot, ignoring");
            return None;
        };
        self.process_generation += 1;
        self.process_in_flight = true;
        debug!(snapshot = %snapshot.id(), generation = self.process_generation, "process started");
        Some(ProcessTicket {
            snapshot,
            params: self.params.get(),
            generation: self.process_generation,
        })
    }

    /// Apply the result of a processing call.
    pub fn complete_process(
        &mut self,
        ticket: ProcessTicket,
        result: Result<ProcessedResult>,
    ) -> Outcome {
        let current = self.snapshot.as_ref().map(Snapshot::id);
        if current != Some(ticket.snapshot_id()) || ticket.generation != self.process_generation {
            info!(
                snapshot = %ticket.snapshot_id(),
                generation = ticket.generation,
                "discarding stale process result"
            );
            return Outcome::Stale;
        }

        self.process_in_flight = false;
        match result {
            Ok(result) => {
                let id = ContourId::new();
                info!(contour = %id, points = result.contour().len(), "process result applied");
                self.processed = Some(StoredResult { id, result });
                // An export of the previous contour can no longer complete.
                self.export_in_flight = None;
                self.error = None;
                Outcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "processing failed");
                self.error = Some(e);
                Outcome::Failed
            }
        }
    }

    /// Process the current snapshot with the current parameters.
    pub async fn on_process_requested(&mut self, client: &impl ProcessingApi) -> Outcome {
        let Some(ticket) = self.begin_process() else {
            return Outcome::Ignored;
        };
        let result = client.process(ticket.snapshot(), ticket.params()).await;
        self.complete_process(ticket, result)
    }

    // -- Export --------------------------------------------------------------

    /// Start an export call for the current contour.
    ///
    /// Returns `None` unless the session is in `Processed`.
    pub fn begin_export(&mut self) -> Option<ExportTicket> {
        if self.export_in_flight.is_some() {
            debug!("export already in flight, ignoring");
            return None;
        }
        let Some(stored) = self.processed.as_ref() else {
            debug!("export requested without a contour, ignoring");
            return None;
        };
        let params = self.params.get();
        self.export_in_flight = Some(stored.id);
        debug!(contour = %stored.id, "export started");
        Some(ExportTicket {
            contour_id: stored.id,
            contour: stored.result.contour().clone(),
            pixels_per_mm: params.pixels_per_mm,
            scale_factor: params.scale_factor,
        })
    }

    /// Apply the result of an export call, handing the drawing to `sink`.
    pub fn complete_export(
        &mut self,
        ticket: ExportTicket,
        result: Result<ExportArtifact>,
        sink: &impl DownloadSink,
    ) -> Outcome {
        let current = self.processed.as_ref().map(|s| s.id);
        if current != Some(ticket.contour_id) || self.export_in_flight != Some(ticket.contour_id) {
            info!(contour = %ticket.contour_id, "discarding stale export result");
            return Outcome::Stale;
        }

        self.export_in_flight = None;
        let artifact = match result {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!(error = %e, "export failed");
                self.error = Some(e);
                return Outcome::Failed;
            }
        };

        match sink.deliver(&artifact) {
            Ok(Some(location)) => {
                info!(location = %location, filename = %artifact.filename, "drawing downloaded");
                self.last_download = Some(location);
                self.error = None;
                Outcome::Applied
            }
            Ok(None) => {
                debug!("download cancelled by user");
                Outcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "download failed");
                self.error = Some(e);
                Outcome::Failed
            }
        }
    }

    /// Export the current contour and download it.
    pub async fn on_export_requested(
        &mut self,
        client: &impl ExportApi,
        sink: &impl DownloadSink,
    ) -> Outcome {
        let Some(ticket) = self.begin_export() else {
            return Outcome::Ignored;
        };
        let result = client
            .export(ticket.contour(), ticket.pixels_per_mm(), ticket.scale_factor())
            .await;
        self.complete_export(ticket, result, sink)
    }

    // -- Errors --------------------------------------------------------------

    /// Surface a failure that happened outside the session, e.g. a service
    /// client that could not be built from the current settings.
    pub fn report_error(&mut self, error: KonturwerkError) {
        warn!(error = %error, "error reported");
        self.error = Some(error);
    }

    /// Clear the surfaced error.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
