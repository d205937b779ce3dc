// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Konturwerk.

use thiserror::Error;

/// Top-level error type for all Konturwerk operations.
#[derive(Debug, Error)]
pub enum KonturwerkError {
    // -- Capture --
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    // -- Parameters --
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    // -- Remote service --
    #[error("could not reach the processing service: {0}")]
    NetworkError(String),

    #[error("service returned {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("malformed service response: {0}")]
    MalformedResponse(String),

    // -- Download / persistence --
    #[error("download failed: {0}")]
    Download(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KonturwerkError>;
