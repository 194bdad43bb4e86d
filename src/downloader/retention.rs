//! Expiry of old files in the serving directory.

use crate::workspace::cleanup_stale_files;
use std::time::Duration;

use super::PlaylistDownloader;

/// Interval between retention sweeps
pub const RETENTION_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

impl PlaylistDownloader {
    /// Delete served files older than `download.retention_hours`
    ///
    /// Returns the number of files removed; failures are logged.
    pub async fn sweep_expired_files(&self) -> usize {
        let max_age =
            Duration::from_secs(self.config.download.retention_hours.saturating_mul(3600));
        cleanup_stale_files(&self.config.download.output_dir, max_age).await
    }

    /// Start the periodic retention sweep
    ///
    /// The first sweep runs immediately. Abort the returned handle to stop it.
    pub fn start_retention_task(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let downloader = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = downloader.sweep_expired_files().await;
                tracing::debug!(removed, "retention sweep finished");
            }
        })
    }
}
