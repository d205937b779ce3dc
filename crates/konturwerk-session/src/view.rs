// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only projection of the session for the presentation layer.

use konturwerk_core::human_errors::{HumanError, humanize_error};
use konturwerk_core::params::ParameterSet;
use konturwerk_core::types::Point;

use crate::controller::{SessionController, SessionState};

/// Everything the UI needs to render one frame of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub state: SessionState,
    pub has_snapshot: bool,
    /// Raw capture as a data URL.
    pub snapshot_preview: Option<String>,
    /// Processed image (capture with the contour drawn on it) as a data URL.
    pub processed_preview: Option<String>,
    /// Number of entries in the detected contour.
    pub contour_points: usize,
    /// Width and height of the contour's bounding box in image pixels, when
    /// the contour decodes to plain points.
    pub contour_extent: Option<(f64, f64)>,
    pub parameters: ParameterSet,
    pub error: Option<HumanError>,
    /// Technical detail behind `error`, for a "details" disclosure.
    pub error_detail: Option<String>,
    pub processing: bool,
    pub last_download: Option<String>,
}

impl SessionView {
    pub(crate) fn from_controller(session: &SessionController) -> Self {
        let processed = session.processed();
        Self {
            state: session.state(),
            has_snapshot: session.snapshot().is_some(),
            snapshot_preview: session.snapshot().map(|s| s.data_url()),
            processed_preview: processed.map(|p| p.data_url()),
            contour_points: processed.map_or(0, |p| p.contour().len()),
            contour_extent: processed
                .and_then(|p| p.contour().points())
                .and_then(|points| extent(&points)),
            parameters: session.parameters(),
            error: session.error().map(humanize_error),
            error_detail: session.error().map(|e| e.to_string()),
            processing: session.is_processing(),
            last_download: session.last_download().map(str::to_owned),
        }
    }

    /// Image to show in the preview pane: the processed image once there is
    /// one, otherwise the raw capture.
    pub fn preview(&self) -> Option<&str> {
        self.processed_preview
            .as_deref()
            .or(self.snapshot_preview.as_deref())
    }

    pub fn can_process(&self) -> bool {
        self.has_snapshot
    }

    pub fn can_export(&self) -> bool {
        self.state == SessionState::Processed
    }

    pub fn exporting(&self) -> bool {
        self.state == SessionState::Exporting
    }
}

fn extent(points: &[Point]) -> Option<(f64, f64)> {
    let first = points.first()?;
    let (mut min, mut max) = (*first, *first);
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((max.x - min.x, max.y - min.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    use konturwerk_core::error::KonturwerkError;
    use konturwerk_core::types::{Contour, ProcessedResult, Snapshot};

    #[test]
    fn idle_view_offers_nothing() {
        let view = SessionController::default().view();
        assert!(!view.can_process());
        assert!(!view.can_export());
        assert!(view.preview().is_none());
    }

    #[test]
    fn processed_image_replaces_capture_in_preview() {
        let mut session = SessionController::default();
        session.on_capture(Snapshot::from_data_url("data:image/png;base64,AQID").unwrap());
        assert_eq!(session.view().preview(), Some("data:image/png;base64,AQID"));

        let ticket = session.begin_process().unwrap();
        let result =
            ProcessedResult::new("AAAA".into(), Contour::from_points(&[(0.0, 0.0), (1.0, 1.0)]))
                .unwrap();
        session.complete_process(ticket, Ok(result));

        let view = session.view();
        assert_eq!(view.preview(), Some("data:image/jpeg;base64,AAAA"));
        assert_eq!(view.contour_points, 2);
        assert!(view.can_export());
    }

    #[test]
    fn service_error_message_reaches_the_view() {
        let mut session = SessionController::default();
        session.on_capture(Snapshot::from_bytes(vec![1]).unwrap());
        let ticket = session.begin_process().unwrap();
        session.complete_process(
            ticket,
            Err(KonturwerkError::ServiceError {
                status: 400,
                message: "No contour detected".into(),
            }),
        );
        let view = session.view();
        assert!(view.error.unwrap().message.contains("No contour detected"));
        assert!(view.error_detail.unwrap().contains("400"));
    }

    #[test]
    fn contour_extent_from_decoded_points() {
        let mut session = SessionController::default();
        session.on_capture(Snapshot::from_bytes(vec![1]).unwrap());
        let ticket = session.begin_process().unwrap();
        let contour = Contour::from_value(serde_json::json!([[[2, 3]], [[12, 3]], [[12, 8]]])).unwrap();
        session.complete_process(ticket, Ok(ProcessedResult::new("AAAA".into(), contour).unwrap()));

        assert_eq!(session.view().contour_extent, Some((10.0, 5.0)));
    }

    #[test]
    fn opaque_contour_has_no_extent() {
        let mut session = SessionController::default();
        session.on_capture(Snapshot::from_bytes(vec![1]).unwrap());
        let ticket = session.begin_process().unwrap();
        let contour = Contour::from_value(serde_json::json!({"spline": [1, 2]})).unwrap();
        session.complete_process(ticket, Ok(ProcessedResult::new("AAAA".into(), contour).unwrap()));

        let view = session.view();
        assert_eq!(view.contour_extent, None);
        assert!(view.can_export());
    }
}
