//! Windowed batch execution

use super::song::SongPipeline;
use crate::types::{BatchJobState, BatchStatus, SongDescriptor, SongStatus};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::path::Path;
use tracing::{debug, info};

/// Runs song pipelines in consecutive fixed-size windows
///
/// Every pipeline of a window is started at once; the next window starts
/// only after all of them reach a terminal state. At most
/// `concurrency_limit` pipelines are ever in flight.
#[derive(Clone)]
pub struct BatchOrchestrator {
    pipeline: SongPipeline,
    concurrency_limit: usize,
}

impl BatchOrchestrator {
    /// Create an orchestrator; a limit of 0 is treated as 1
    pub fn new(pipeline: SongPipeline, concurrency_limit: usize) -> Self {
        Self {
            pipeline,
            concurrency_limit: concurrency_limit.max(1),
        }
    }

    /// Window size in use
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Run every descriptor through the pipeline.
    ///
    /// Song order in the result matches `descriptors`. Counters are updated
    /// here, after each pipeline settles, so `completed + failed == total`
    /// once the returned state is `completed`.
    pub async fn run(
        &self,
        collection_name: impl Into<String>,
        descriptors: &[SongDescriptor],
        workspace_dir: &Path,
    ) -> BatchJobState {
        let mut batch = BatchJobState::new(collection_name, descriptors);
        let limit = self.concurrency_limit;

        for (window_index, (window, states)) in descriptors
            .chunks(limit)
            .zip(batch.songs.chunks_mut(limit))
            .enumerate()
        {
            let first = window_index * limit;
            debug!(window = window_index, songs = window.len(), "starting window");

            let mut in_flight: FuturesUnordered<_> = window
                .iter()
                .zip(states.iter_mut())
                .enumerate()
                .map(|(offset, (descriptor, state))| async move {
                    self.pipeline
                        .run(descriptor, first + offset, workspace_dir, state)
                        .await;
                    state.status
                })
                .collect();

            while let Some(status) = in_flight.next().await {
                if status == SongStatus::Completed {
                    batch.completed_songs += 1;
                } else {
                    batch.failed_songs += 1;
                }
            }
        }

        batch.overall_status = BatchStatus::Completed;
        info!(
            collection = %batch.collection_name,
            total = batch.total_songs,
            completed = batch.completed_songs,
            failed = batch.failed_songs,
            "batch finished"
        );
        batch
    }
}
