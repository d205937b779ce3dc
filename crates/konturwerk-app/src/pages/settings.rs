// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page: service address and download behaviour.

use std::path::PathBuf;

use dioxus::prelude::*;

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut save_msg = use_signal(|| Option::<String>::None);

    let download_dir = state
        .read()
        .config
        .download_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_default();
    let default_exports = svc.data_dir().join("exports").display().to_string();

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Processing Service" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Service URL" }
                    input {
                        r#type: "url",
                        style: "width: 260px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{state.read().config.service_url}",
                        onchange: move |evt| {
                            state.write().config.service_url = evt.value().trim().to_string();
                        },
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Request timeout (seconds)" }
                    input {
                        r#type: "number",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{state.read().config.request_timeout_secs}",
                        onchange: move |evt| {
                            if let Ok(secs) = evt.value().parse::<u64>()
                                && secs > 0
                            {
                                state.write().config.request_timeout_secs = secs;
                            }
                        },
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Downloads" }
                SettingRow {
                    label: "Ask where to save each drawing",
                    checked: state.read().config.ask_where_to_save,
                    on_toggle: move |v: bool| { state.write().config.ask_where_to_save = v; },
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Download folder" }
                    input {
                        style: "width: 260px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        placeholder: "{default_exports}",
                        value: "{download_dir}",
                        onchange: move |evt| {
                            let value = evt.value();
                            let value = value.trim();
                            state.write().config.download_dir =
                                (!value.is_empty()).then(|| PathBuf::from(value));
                        },
                    }
                }
            }

            // Save button
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                save_msg.set(Some("Settings saved.".into()));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some(format!("Save failed: {e}")));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some(ref msg) = *save_msg.read() {
                p { style: "color: #34c759; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Konturwerk v0.3.0"
                    br {}
                    "Camera-to-DXF contour capture"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn SettingRow(label: &'static str, checked: bool, on_toggle: EventHandler<bool>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "checkbox",
                checked: checked,
                onchange: move |evt| {
                    on_toggle.call(evt.checked());
                },
            }
        }
    }
}
