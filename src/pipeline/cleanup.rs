//! Removal of run artifacts: the downloaded source and the chunk
//! directory.
//!
//! Cleanup is best-effort and idempotent: missing paths are fine,
//! filesystem failures are logged at warn and never escalated, and calling
//! it twice is a no-op the second time. `ArtifactGuard` ties cleanup to
//! scope exit so a run that fails mid-pipeline still removes whatever it
//! created.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Remove the source file, every file directly inside the chunk directory,
/// then the directory itself.
pub fn cleanup_artifacts(source: &Path, chunk_dir: &Path) {
    match fs::remove_file(source) {
        Ok(()) => log::debug!("removed source {}", source.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("failed to remove source {}: {}", source.display(), e),
    }

    let entries = match fs::read_dir(chunk_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return,
        Err(e) => {
            log::warn!("failed to read chunk dir {}: {}", chunk_dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file()
            && let Err(e) = fs::remove_file(&path)
        {
            log::warn!("failed to remove chunk artifact {}: {}", path.display(), e);
        }
    }

    match fs::remove_dir(chunk_dir) {
        Ok(()) => log::debug!("removed chunk dir {}", chunk_dir.display()),
        Err(e) => log::warn!(
            "failed to remove chunk dir {}: {}",
            chunk_dir.display(),
            e
        ),
    }
}

/// Scope guard that cleans up run artifacts on drop.
pub struct ArtifactGuard {
    source: PathBuf,
    chunk_dir: PathBuf,
    armed: bool,
}

impl ArtifactGuard {
    pub fn new(source: PathBuf, chunk_dir: PathBuf) -> Self {
        Self {
            source,
            chunk_dir,
            armed: true,
        }
    }

    /// Keep the artifacts (e.g. `--keep-artifacts`); drop becomes a no-op.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Run cleanup now instead of waiting for scope exit.
    pub fn finish(mut self) {
        self.armed = false;
        cleanup_artifacts(&self.source, &self.chunk_dir);
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if self.armed {
            cleanup_artifacts(&self.source, &self.chunk_dir);
        }
    }
}
