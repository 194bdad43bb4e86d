//! Lookup of files in the serving directory.

use crate::error::Result;
use std::path::PathBuf;

use super::PlaylistDownloader;

/// A servable file on disk
#[derive(Clone, Debug)]
pub struct ServedFile {
    /// Absolute path
    pub path: PathBuf,
    /// Name the file is served under
    pub filename: String,
    /// MIME type derived from the extension
    pub mime_type: &'static str,
    /// Size in bytes
    pub size: u64,
}

impl PlaylistDownloader {
    /// Resolve a filename from a download URL to the file it names
    ///
    /// # Errors
    ///
    /// `Error::Validation` for names with path components,
    /// `Error::UnsupportedFileType` outside the allow-list,
    /// `Error::FileNotFound` when absent.
    pub async fn served_file(&self, filename: &str) -> Result<ServedFile> {
        let path = self.pipeline.materializer().resolve_served(filename).await?;
        let size = tokio::fs::metadata(&path).await?.len();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        Ok(ServedFile {
            mime_type: crate::materialize::mime_type(extension),
            filename: filename.to_string(),
            path,
            size,
        })
    }
}
