//! Infrastructure implementation of the `RolloutLock` port.
//!
//! `FileRolloutLock` excludes concurrent `cf-recycle` processes with one lock
//! file per application GUID, created atomically with `create_new`.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::RolloutLock;

/// Lock directory holding `<guid>.lock` files.
#[derive(Debug, Clone)]
pub struct FileRolloutLock {
    dir: PathBuf,
}

impl FileRolloutLock {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.lock"))
    }
}

/// Removes the lock file when dropped.
#[derive(Debug)]
pub struct FileLockGuard {
    path: PathBuf,
}

impl FileLockGuard {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release rollout lock");
        }
    }
}

impl RolloutLock for FileRolloutLock {
    type Guard = FileLockGuard;

    fn try_acquire(&self, key: &str) -> Result<Option<FileLockGuard>> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating lock directory {}", self.dir.display()))?;
        let path = self.lock_path(key);
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::warn!(
                    path = %path.display(),
                    "rollout lock already held; delete the file if no recycle is running"
                );
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("creating lock file {}", path.display()));
            }
        };
        let guard = FileLockGuard { path };
        writeln!(
            file,
            "pid={} acquired={}",
            std::process::id(),
            chrono::Utc::now().to_rfc3339()
        )
        .with_context(|| format!("writing lock file {}", guard.path.display()))?;
        tracing::debug!(path = %guard.path.display(), "rollout lock acquired");
        Ok(Some(guard))
    }
}
