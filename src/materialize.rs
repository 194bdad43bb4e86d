//! Turning finished files into externally addressable download handles

use crate::error::{Error, Result};
use crate::types::DownloadHandle;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Route (relative to the public base URL) that serves finished files
pub const DOWNLOAD_ROUTE: &str = "/api/v1/files/download";

/// Extensions that may ever be served, with their MIME types
const SERVABLE: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("flac", "audio/flac"),
    ("m4a", "audio/mp4"),
    ("zip", "application/zip"),
];

/// MIME type for a file extension (without the dot, any case)
///
/// # Examples
///
/// ```
/// use playlist_dl::materialize::mime_type;
///
/// assert_eq!(mime_type("MP3"), "audio/mpeg");
/// assert_eq!(mime_type("exe"), "application/octet-stream");
/// ```
pub fn mime_type(extension: &str) -> &'static str {
    SERVABLE
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}

/// Whether files with this extension may be served
pub fn is_servable(extension: &str) -> bool {
    SERVABLE
        .iter()
        .any(|(ext, _)| ext.eq_ignore_ascii_case(extension))
}

fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

/// Builds download handles and owns the serving directory
#[derive(Clone, Debug)]
pub struct Materializer {
    base_url: String,
    output_dir: PathBuf,
}

impl Materializer {
    /// Create a materializer for files served from `output_dir` under `base_url`
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            output_dir: output_dir.into(),
        }
    }

    /// Directory served files live in
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Describe `path` as a download handle.
    ///
    /// The URL is deterministic: `{base_url}/api/v1/files/download/{encoded}`.
    /// `size` is left at 0; callers fill it from the file's metadata.
    ///
    /// # Errors
    ///
    /// `Error::UnsupportedFileType` if the extension is not allow-listed.
    pub fn materialize(&self, path: &Path) -> Result<DownloadHandle> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::FileNotFound(path.display().to_string()))?
            .to_string();

        let extension = extension_of(path);
        if !is_servable(extension) {
            return Err(Error::UnsupportedFileType(filename));
        }

        Ok(DownloadHandle {
            url: format!(
                "{}{}/{}",
                self.base_url,
                DOWNLOAD_ROUTE,
                urlencoding::encode(&filename)
            ),
            mime_type: mime_type(extension).to_string(),
            filename,
            size: 0,
        })
    }

    /// Fail unless `path` has an allow-listed extension
    ///
    /// # Errors
    ///
    /// `Error::UnsupportedFileType` naming the file otherwise.
    pub fn ensure_servable(&self, path: &Path) -> Result<()> {
        if is_servable(extension_of(path)) {
            Ok(())
        } else {
            Err(Error::UnsupportedFileType(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ))
        }
    }

    /// Move a finished file into the serving directory under a unique name
    /// derived from `base_name`, keeping its extension.
    pub async fn promote(&self, source: &Path, base_name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let filename = crate::utils::unique_filename(base_name, extension_of(source));
        let destination = self.output_dir.join(filename);
        crate::utils::move_file(source, &destination).await?;

        debug!(
            from = %source.display(),
            to = %destination.display(),
            "promoted file to serving directory"
        );
        Ok(destination)
    }

    /// Map a requested filename back to a path in the serving directory.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` for names containing separators or `..`
    /// - `Error::UnsupportedFileType` for extensions outside the allow-list
    /// - `Error::FileNotFound` when no such file exists
    pub async fn resolve_served(&self, filename: &str) -> Result<PathBuf> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename.contains("..")
        {
            return Err(Error::Validation(format!("invalid filename: {filename}")));
        }

        if !is_servable(extension_of(Path::new(filename))) {
            return Err(Error::UnsupportedFileType(filename.to_string()));
        }

        let path = self.output_dir.join(filename);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(Error::FileNotFound(filename.to_string())),
        }
    }
}
