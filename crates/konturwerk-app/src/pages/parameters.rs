// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing parameter form.
//
// Values are written through the session on change. A rejected value leaves
// the previous one in force and shows a hint under the field; it never
// replaces the error from the last remote call.

use std::collections::HashMap;

use dioxus::prelude::*;

use konturwerk_core::human_errors::humanize_error;
use konturwerk_core::params::ParameterName;

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn ParameterForm() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut rejected = use_signal(HashMap::<ParameterName, String>::new);
    let mut form_msg = use_signal(|| Option::<String>::None);

    let params = state.read().session.parameters();
    let rows: Vec<(ParameterName, String, Option<String>)> = ParameterName::ALL
        .into_iter()
        .map(|name| (name, params.get(name).to_string(), rejected.read().get(&name).cloned()))
        .collect();

    rsx! {
        section { style: "margin: 16px 0;",
            h3 { "Parameters" }
            for (name, value, hint) in rows {
                div { key: "{name}",
                    style: "padding: 8px 0; border-bottom: 1px solid #f0f0f0;",
                    div { style: "display: flex; justify-content: space-between; align-items: center;",
                        label { title: name.description(), "{name.label()}" }
                        input {
                            r#type: "number",
                            step: name.step(),
                            min: "{name.advisory_range().0}",
                            max: "{name.advisory_range().1}",
                            style: "width: 120px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                            value: "{value}",
                            onchange: move |evt| {
                                let raw = evt.value();
                                match state.write().session.on_set_parameter(name.wire_name(), &raw) {
                                    Ok(_) => {
                                        rejected.write().remove(&name);
                                    }
                                    Err(e) => {
                                        rejected.write().insert(name, humanize_error(&e).message);
                                    }
                                }
                            },
                        }
                    }
                    if let Some(hint) = hint {
                        p { style: "color: #ff3b30; font-size: 12px; margin: 4px 0 0;", "{hint}" }
                    }
                }
            }

            div { style: "display: flex; gap: 8px; margin-top: 8px;",
                button {
                    style: "flex: 1; padding: 8px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                    onclick: move |_| {
                        state.write().session.reset_parameters();
                        rejected.write().clear();
                        form_msg.set(Some("Default values restored.".into()));
                    },
                    "Reset"
                }
                button {
                    style: "flex: 1; padding: 8px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let params = state.read().session.parameters();
                            match svc.save_default_parameters(params) {
                                Ok(()) => {
                                    tracing::info!("default parameters saved");
                                    state.write().config.default_parameters = params;
                                    form_msg.set(Some("Saved as defaults.".into()));
                                }
                                Err(e) => {
                                    tracing::error!(error = %e, "failed to save default parameters");
                                    form_msg.set(Some(format!("Save failed: {e}")));
                                }
                            }
                        }
                    },
                    "Save as defaults"
                }
            }
            if let Some(ref msg) = *form_msg.read() {
                p { style: "color: #666; font-size: 13px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }
        }
    }
}
