// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Konturwerk Session: the orchestrator behind the UI.
//
// One `SessionController` owns the snapshot, the parameters and the latest
// processing result, and exposes the user actions as methods. Network calls
// are split into begin/complete halves so the UI can run them without
// holding the controller, and so late results can be recognised as stale.

pub mod controller;
pub mod view;

pub use controller::{ExportTicket, Outcome, ProcessTicket, SessionController, SessionState};
pub use view::SessionView;
