//! Packaging finished songs into a single zip archive

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::CompressionMethod;
use zip::write::FileOptions;

/// One file to place in the archive
#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    /// File on disk
    pub source_path: PathBuf,
    /// Name inside the archive
    pub entry_name: String,
}

/// Builds deflate archives at maximum compression
pub struct ArchiveBuilder;

impl ArchiveBuilder {
    /// Write `entries` into a new archive at `output`.
    ///
    /// Entries whose source file no longer exists are skipped with a warning.
    /// Returns the number of entries written.
    ///
    /// # Errors
    ///
    /// `Error::ArchiveWrite` on any I/O or encoding failure.
    pub async fn build(entries: &[ArchiveEntry], output: &Path) -> Result<usize> {
        let entries = entries.to_vec();
        let output_path = output.to_path_buf();

        let written = tokio::task::spawn_blocking(move || write_archive(&entries, &output_path))
            .await
            .map_err(|e| Error::ArchiveWrite {
                path: output.to_path_buf(),
                reason: format!("archive task failed: {e}"),
            })?
            .map_err(|e| Error::ArchiveWrite {
                path: output.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!(path = %output.display(), entries = written, "archive created");
        Ok(written)
    }
}

fn write_archive(entries: &[ArchiveEntry], output: &Path) -> zip::result::ZipResult<usize> {
    let file = File::create(output)?;
    let mut zip = zip::ZipWriter::new(BufWriter::new(file));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    let mut written = 0;
    for entry in entries {
        let source = match File::open(&entry.source_path) {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %entry.source_path.display(), "skipping missing archive entry");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        zip.start_file(entry.entry_name.as_str(), options)?;
        std::io::copy(&mut BufReader::new(source), &mut zip)?;
        debug!(entry = %entry.entry_name, "added archive entry");
        written += 1;
    }

    zip.finish()?;
    Ok(written)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    fn entry(dir: &Path, file: &str, name: &str) -> ArchiveEntry {
        ArchiveEntry {
            source_path: dir.join(file),
            entry_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn archives_existing_files_with_entry_names() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"first song").unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"second song").unwrap();
        let output = dir.path().join("mix.zip");

        let written = ArchiveBuilder::build(
            &[
                entry(dir.path(), "a.mp3", "01 - Artist A - Song A.mp3"),
                entry(dir.path(), "b.mp3", "02 - Artist B - Song B.mp3"),
            ],
            &output,
        )
        .await
        .unwrap();

        assert_eq!(written, 2);
        let mut archive = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut contents = String::new();
        archive
            .by_name("01 - Artist A - Song A.mp3")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "first song");
    }

    #[tokio::test]
    async fn missing_entry_is_skipped_without_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        let output = dir.path().join("mix.zip");

        let written = ArchiveBuilder::build(
            &[
                entry(dir.path(), "a.mp3", "a.mp3"),
                entry(dir.path(), "gone.mp3", "gone.mp3"),
            ],
            &output,
        )
        .await
        .unwrap();

        assert_eq!(written, 1);
        let archive = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.file_names().collect::<Vec<_>>(), vec!["a.mp3"]);
    }

    #[tokio::test]
    async fn unwritable_output_is_archive_write_error() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("missing-dir").join("mix.zip");

        let err = ArchiveBuilder::build(&[], &output).await.unwrap_err();
        assert!(matches!(err, Error::ArchiveWrite { .. }));
    }
}
