// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state: reactive signal for the Dioxus UI.
//
// The session controller is the single owner of the workflow state and the
// parameter values. Pages read it through `SessionView` and mutate it only
// through its action methods.

use konturwerk_core::AppConfig;
use konturwerk_core::params::ParameterStore;
use konturwerk_session::{SessionController, SessionView};

use crate::services::app_services::AppServices;

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug)]
pub struct AppState {
    /// Capture → process → export workflow.
    pub session: SessionController,
    /// Application settings being edited on the settings page.
    pub config: AppConfig,
    /// Status message for user feedback (non-error).
    pub status_message: Option<String>,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        let config = svc.config();
        let params = ParameterStore::with_values(config.default_parameters);
        Self {
            session: SessionController::new(params),
            config,
            status_message: None,
        }
    }

    pub fn view(&self) -> SessionView {
        self.session.view()
    }
}
