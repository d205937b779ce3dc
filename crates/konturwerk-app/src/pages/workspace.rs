// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workspace page: capture, process, preview, export.
//
// Remote calls run in spawned tasks. Each call carries a ticket from the
// session controller; when the task finishes the controller decides whether
// the result still applies or is stale.

use dioxus::prelude::*;

use konturwerk_core::human_errors::{HumanError, Severity};
use konturwerk_session::{Outcome, SessionState};

use crate::pages::parameters::ParameterForm;
use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Workspace() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let view = state.read().view();
    let status = state.read().status_message.clone();
    let exporting = view.exporting();

    rsx! {
        div {
            h1 { "Konturwerk" }
            p { style: "color: #666;", "Capture a part, detect its outline, download it as DXF." }

            // Preview pane
            div { style: "display: flex; align-items: center; justify-content: center; min-height: 240px; border: 1px solid #e0e0e0; border-radius: 12px; background: #f7f7f7; overflow: hidden; margin: 16px 0;",
                if let Some(src) = view.preview() {
                    img { style: "max-width: 100%; max-height: 480px;", src: "{src}" }
                } else {
                    span { style: "color: #aaa;", "No image captured yet." }
                }
            }
            if view.contour_points > 0 {
                p { style: "color: #666; font-size: 13px; text-align: center;",
                    "Contour with {view.contour_points} points"
                    if let Some((w, h)) = view.contour_extent {
                        ", {w:.0} × {h:.0} px"
                    }
                }
            }

            // Capture / discard
            div { style: "display: flex; gap: 8px;",
                button {
                    style: "flex: 2; padding: 14px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let bridge = match svc.bridge() {
                                Ok(b) => b,
                                Err(e) => {
                                    state.write().session.report_error(e);
                                    return;
                                }
                            };
                            let outcome = state.write().session.capture_from(&bridge.as_ref());
                            if outcome == Outcome::Applied {
                                state.write().status_message = Some("Image captured.".into());
                            }
                        }
                    },
                    if view.has_snapshot { "Retake" } else { "Capture" }
                }
                button {
                    style: "flex: 1; padding: 14px; border-radius: 12px; border: 1px solid #ccc; background: white; font-size: 16px;",
                    disabled: !view.has_snapshot,
                    onclick: move |_| {
                        state.write().session.on_discard();
                        state.write().status_message = None;
                    },
                    "Discard"
                }
            }

            ParameterForm {}

            // Remote actions
            div { style: "display: flex; gap: 8px; margin-top: 16px;",
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white;",
                    disabled: !view.can_process(),
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let client = match svc.processing() {
                                Ok(c) => c,
                                Err(e) => {
                                    state.write().session.report_error(e);
                                    return;
                                }
                            };
                            let Some(ticket) = state.write().session.begin_process() else {
                                return;
                            };
                            state.write().status_message = Some("Processing…".into());
                            spawn(async move {
                                let result = client.process(ticket.snapshot(), ticket.params()).await;
                                let outcome = state.write().session.complete_process(ticket, result);
                                match outcome {
                                    Outcome::Applied => {
                                        state.write().status_message = Some("Contour detected.".into());
                                    }
                                    Outcome::Failed => state.write().status_message = None,
                                    Outcome::Stale | Outcome::Ignored => {}
                                }
                            });
                        }
                    },
                    if view.processing { "Processing…" } else { "Process Image" }
                }
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white;",
                    disabled: !view.can_export() || exporting,
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let prepared = svc.export().and_then(|c| Ok((c, svc.bridge()?)));
                            let (client, bridge) = match prepared {
                                Ok(pair) => pair,
                                Err(e) => {
                                    state.write().session.report_error(e);
                                    return;
                                }
                            };
                            let Some(ticket) = state.write().session.begin_export() else {
                                return;
                            };
                            state.write().status_message = Some("Exporting DXF…".into());
                            spawn(async move {
                                let result = client
                                    .export(ticket.contour(), ticket.pixels_per_mm(), ticket.scale_factor())
                                    .await;
                                let outcome = state.write().session.complete_export(ticket, result, &bridge);
                                let message = match outcome {
                                    Outcome::Applied => Some(
                                        state
                                            .read()
                                            .session
                                            .last_download()
                                            .map(|path| format!("Saved to {path}"))
                                            .unwrap_or_else(|| "Export finished.".into()),
                                    ),
                                    _ => None,
                                };
                                if outcome != Outcome::Stale {
                                    state.write().status_message = message;
                                }
                            });
                        }
                    },
                    if exporting { "Exporting…" } else { "Export DXF" }
                }
            }

            if let Some(ref msg) = status {
                p { style: "color: #34c759; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            if let Some(error) = view.error.clone() {
                ErrorBanner {
                    error: error,
                    detail: view.error_detail.clone().unwrap_or_default(),
                    on_dismiss: move |_| state.write().session.dismiss_error(),
                }
            }

            if view.state == SessionState::Idle && view.error.is_none() {
                p { style: "color: #aaa; font-size: 13px; text-align: center; margin-top: 24px;",
                    "Start by capturing an image of the part on a plain background."
                }
            }
        }
    }
}

#[component]
fn ErrorBanner(error: HumanError, detail: String, on_dismiss: EventHandler<()>) -> Element {
    let colour = severity_colour(error.severity);
    rsx! {
        div { style: "margin-top: 16px; padding: 12px; border-radius: 8px; border-left: 4px solid {colour}; background: #fff5f5;",
            strong { "{error.message}" }
            p { style: "margin: 4px 0; color: #444; font-size: 14px;", "{error.suggestion}" }
            details { style: "font-size: 12px; color: #888;",
                summary { "Details" }
                code { "{detail}" }
            }
            button {
                style: "margin-top: 8px; padding: 4px 12px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                onclick: move |_| on_dismiss.call(()),
                "Dismiss"
            }
        }
    }
}

fn severity_colour(severity: Severity) -> &'static str {
    match severity {
        Severity::Transient => "#ff9500",
        Severity::ActionRequired => "#007aff",
        Severity::Permanent => "#ff3b30",
    }
}
