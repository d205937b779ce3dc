// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Download sink that writes artifacts into a directory, browser-style:
// an existing `contour_output.dxf` is never overwritten; the next export
// lands in `contour_output (1).dxf`.

use std::path::{Path, PathBuf};

use tracing::info;

use konturwerk_core::error::{KonturwerkError, Result};
use konturwerk_core::types::ExportArtifact;

use crate::traits::DownloadSink;

/// Give up looking for a free name after this many collisions.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Writes downloads into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First path in the directory not already taken by a file.
    fn free_path(&self, filename: &str) -> Result<PathBuf> {
        let candidate = self.dir.join(filename);
        if !candidate.exists() {
            return Ok(candidate);
        }

        let (stem, ext) = match filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (filename, None),
        };

        for n in 1..=MAX_NAME_ATTEMPTS {
            let name = match ext {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            };
            let candidate = self.dir.join(name);
            if !candidate.exists() {
                return Ok(candidate);
            }
        }

        Err(KonturwerkError::Download(format!(
            "no free filename for {filename} in {}",
            self.dir.display()
        )))
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<Option<String>> {
        // Filenames from the artifact are never allowed to climb out of the
        // download directory.
        let filename = Path::new(&artifact.filename)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                KonturwerkError::Download(format!("invalid filename {:?}", artifact.filename))
            })?;

        std::fs::create_dir_all(&self.dir)?;
        let path = self.free_path(filename)?;
        std::fs::write(&path, &artifact.bytes)?;

        info!(path = %path.display(), bytes = artifact.bytes.len(), "download written");
        Ok(Some(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_exact_bytes_under_suggested_name() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        let artifact = ExportArtifact::new(vec![0, 159, 146, 150]);

        let location = sink.deliver(&artifact).unwrap().unwrap();
        let path = dir.path().join("contour_output.dxf");
        assert_eq!(location, path.display().to_string());
        assert_eq!(std::fs::read(path).unwrap(), vec![0, 159, 146, 150]);
    }

    #[test]
    fn second_download_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        sink.deliver(&ExportArtifact::new(b"first".to_vec())).unwrap();
        sink.deliver(&ExportArtifact::new(b"second".to_vec())).unwrap();

        assert_eq!(std::fs::read(dir.path().join("contour_output.dxf")).unwrap(), b"first");
        assert_eq!(
            std::fs::read(dir.path().join("contour_output (1).dxf")).unwrap(),
            b"second"
        );
    }

    #[test]
    fn path_components_are_stripped_from_filename() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("downloads"));
        let artifact = ExportArtifact {
            bytes: vec![1],
            filename: "../../escape.dxf".into(),
        };
        sink.deliver(&artifact).unwrap();
        assert!(dir.path().join("downloads").join("escape.dxf").exists());
    }
}
