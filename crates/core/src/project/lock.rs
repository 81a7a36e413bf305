use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use super::ProjectLayout;

const RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// How long `acquire` waits for another process to release the project.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(10);

/// Exclusive hold on a project's `.ft9xx/lock` file.
///
/// Separate processes editing the same project serialize on this file; the
/// in-process `WorkspaceContext` mutex does not reach across processes. The
/// file is removed when the guard is dropped.
#[derive(Debug)]
pub struct ProjectLock {
    path: PathBuf,
}

impl ProjectLock {
    pub fn acquire(layout: &ProjectLayout) -> Result<Self> {
        Self::acquire_with_wait(layout, DEFAULT_LOCK_WAIT)
    }

    /// Retry until `wait` has elapsed, then fail naming the lock file.
    pub fn acquire_with_wait(layout: &ProjectLayout, wait: Duration) -> Result<Self> {
        let path = layout.lock_path.clone();
        let deadline = Instant::now() + wait;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    // Owner pid, for whoever finds a stale lock.
                    let _ = writeln!(file, "{}", std::process::id());
                    tracing::debug!(path = %path.display(), "Acquired project lock");
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if Instant::now() >= deadline {
                        bail!(
                            "Project is locked by another ft9xx process: {} \
                             (delete it if no other ft9xx command is running)",
                            path.display()
                        );
                    }
                    thread::sleep(RETRY_INTERVAL);
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to create project lock: {}", path.display())
                    })
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to release project lock");
        }
    }
}
