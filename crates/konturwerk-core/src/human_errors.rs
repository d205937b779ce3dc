// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the status line.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Messages from the processing service are shown verbatim, since they are
// usually the most specific explanation available ("No contour detected").

use crate::error::KonturwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip or busy service; trying again may work.
    Transient,
    /// User must do something (retake the photo, fix a value).
    ActionRequired,
    /// Cannot be fixed by retrying: bug or incompatible service.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether re-issuing the same action may succeed.
    pub retriable: bool,
    /// Severity level (drives colour in the UI).
    pub severity: Severity,
}

/// Convert a `KonturwerkError` into a `HumanError`.
pub fn humanize_error(err: &KonturwerkError) -> HumanError {
    match err {
        KonturwerkError::DeviceUnavailable(_) => HumanError {
            message: "The camera isn't available.".into(),
            suggestion: "Check that the camera is connected and that this app is allowed to use it, then capture again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        KonturwerkError::UnknownParameter(name) => HumanError {
            message: format!("There is no setting called \"{name}\"."),
            suggestion: "This is a bug in the form. Please report it.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        KonturwerkError::InvalidValue {
            name,
            value,
            reason,
        } => HumanError {
            message: format!("\"{value}\" isn't a valid value for {name}: {reason}."),
            suggestion: "Enter a different value. The previous value is still in use.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        KonturwerkError::NetworkError(detail) => humanize_network_error(detail),

        KonturwerkError::ServiceError { status, message } => {
            if (500..600).contains(status) {
                HumanError {
                    message: format!("The processing service failed: {message}"),
                    suggestion: "Try again in a moment. If it keeps failing, restart the service.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            } else {
                HumanError {
                    message: format!("The processing service rejected the request: {message}"),
                    suggestion: "Try retaking the photo with better contrast, or adjust the threshold.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            }
        }

        KonturwerkError::MalformedResponse(_) => HumanError {
            message: "The processing service sent back something unexpected.".into(),
            suggestion: "Check that the service URL in the settings points at a compatible service.".into(),
            retriable: true,
            severity: Severity::Permanent,
        },

        KonturwerkError::Download(_) => HumanError {
            message: "The drawing couldn't be saved.".into(),
            suggestion: "Check there is free space in the download folder, then export again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        KonturwerkError::Config(detail) => HumanError {
            message: "The processing service address can't be used.".into(),
            suggestion: format!(
                "Check the service URL in Settings or the KONTURWERK_SERVICE_URL variable. ({detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        KonturwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to write there.".into(),
                    suggestion: "Choose a different folder and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        KonturwerkError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        KonturwerkError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Some features need a camera or a desktop file system.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

fn humanize_network_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("timed out") || lower.contains("timeout") {
        HumanError {
            message: "The processing service didn't respond in time.".into(),
            suggestion: "Large photos take longer. Try again, or raise the timeout in the settings.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    } else if lower.contains("connection refused") || lower.contains("connect") {
        HumanError {
            message: "We couldn't reach the processing service.".into(),
            suggestion: "Make sure the service is running and the URL in the settings is right.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    } else {
        HumanError {
            message: "The connection to the processing service failed.".into(),
            suggestion: format!("Try again. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}
