// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::{Path, PathBuf};

use konturwerk_core::error::Result;

/// Return the application data directory, creating it if needed.
///
/// Holds `config.json` and, unless configured otherwise, exported drawings.
pub fn data_dir() -> Result<PathBuf> {
    ensure(dirs_fallback().join("konturwerk"))
}

/// Return a subdirectory inside `base` (e.g. "exports"), creating it if needed.
pub fn subdir(base: &Path, name: &str) -> Result<PathBuf> {
    ensure(base.join(name))
}

/// Scratch location used when the regular data directory cannot be created.
pub fn temp_dir() -> Result<PathBuf> {
    ensure(std::env::temp_dir().join("konturwerk"))
}

fn ensure(dir: PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn dirs_fallback() -> PathBuf {
    // Try XDG data dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdir_is_created() {
        let base = tempfile::tempdir().unwrap();
        let exports = subdir(base.path(), "exports").unwrap();
        assert!(exports.is_dir());
        assert_eq!(exports, base.path().join("exports"));
    }
}
