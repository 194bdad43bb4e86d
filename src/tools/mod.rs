//! External audio search/fetch tool
//!
//! The [`AudioToolBackend`] trait hides how audio sources are searched and
//! downloaded. Implementations:
//!
//! - [`YtDlpBackend`]: drives the external `yt-dlp` binary
//! - [`UnavailableBackend`]: stub used when no binary can be found
//!
//! ```no_run
//! use playlist_dl::tools::{AudioToolBackend, UnavailableBackend, YtDlpBackend};
//! use std::sync::Arc;
//!
//! let backend: Arc<dyn AudioToolBackend> = match YtDlpBackend::from_path() {
//!     Some(cli) => Arc::new(cli),
//!     None => Arc::new(UnavailableBackend),
//! };
//! ```

mod cli;
mod noop;
mod parser;
mod traits;

pub use cli::YtDlpBackend;
pub use noop::UnavailableBackend;
pub use traits::{AudioToolBackend, FetchRequest, SearchRecord};

use crate::config::ToolsConfig;
use std::sync::Arc;

/// Pick the best backend for `config`, degrading to [`UnavailableBackend`]
pub fn backend_from_config(config: &ToolsConfig) -> Arc<dyn AudioToolBackend> {
    match YtDlpBackend::from_config(config) {
        Some(backend) => {
            tracing::info!("using yt-dlp audio backend");
            Arc::new(backend)
        }
        None => {
            tracing::warn!("yt-dlp not found, searches and downloads are disabled");
            Arc::new(UnavailableBackend)
        }
    }
}
