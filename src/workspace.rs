//! Per-request temporary workspaces and served-file retention

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// An isolated directory owned by one batch or one single-song request
///
/// Directory names combine a prefix, a millisecond timestamp and a random
/// token so concurrent requests never share a workspace. The directory is
/// removed by [`Workspace::cleanup`]; files that must outlive the request
/// are moved out before that.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Create a fresh workspace under `root`
    pub async fn create(root: &Path, prefix: &str) -> Result<Self> {
        let name = format!(
            "{}-{}-{}",
            prefix,
            chrono::Utc::now().timestamp_millis(),
            crate::utils::random_token(9)
        );
        let path = root.join(name);

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| Error::Workspace {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), "created workspace");
        Ok(Self { path })
    }

    /// Workspace directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the workspace and everything left in it.
    ///
    /// Failures are logged and swallowed so they never replace the outcome
    /// the caller is about to report.
    pub async fn cleanup(self) {
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "removed workspace"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to clean up workspace")
            }
        }
    }
}

/// Delete regular files in `dir` last modified more than `max_age` ago.
///
/// Returns the number of files removed. Per-file failures are logged.
pub async fn cleanup_stale_files(dir: &Path, max_age: Duration) -> usize {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(dir = %dir.display(), error = %e, "failed to read directory for cleanup");
            }
            return 0;
        }
    };

    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let mut removed = 0;

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                break;
            }
        };

        let path = entry.path();
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            continue;
        };

        if modified < cutoff {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "failed to delete old file"),
            }
        }
    }

    if removed > 0 {
        info!(dir = %dir.display(), removed, "removed expired files");
    }
    removed
}
