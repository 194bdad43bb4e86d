//! Per-song pipeline and windowed batch orchestration

mod orchestrator;
mod song;

pub use orchestrator::BatchOrchestrator;
pub use song::{CompletedSong, SongPipeline};
