//! Utility functions for filenames and file moves

use crate::error::Result;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::path::Path;

/// Fallback stem when sanitisation leaves nothing usable
const FALLBACK_STEM: &str = "track";

/// Random lowercase alphanumeric token of `len` characters
pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Build a filename slug from artist and title: `"{artist} - {title}"` with
/// everything except ASCII letters, digits, spaces, `-` and `_` removed.
///
/// # Examples
///
/// ```
/// use playlist_dl::utils::song_slug;
///
/// assert_eq!(song_slug("AC/DC", "T.N.T."), "ACDC - TNT");
/// ```
#[must_use]
pub fn song_slug(artist: &str, title: &str) -> String {
    format!("{artist} - {title}")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sanitize a name for use as a filename stem
///
/// Removes everything except word characters, whitespace, `-` and `_`,
/// replaces whitespace runs with `_`, collapses repeated underscores and
/// trims leading/trailing underscores. Never returns an empty string.
///
/// # Examples
///
/// ```
/// use playlist_dl::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Artist A - Song (Live)!"), "Artist_A_-_Song_Live");
/// assert_eq!(sanitize_filename("???"), "track");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_underscore = false;

    for c in name.chars() {
        let mapped = if c.is_whitespace() || c == '_' {
            '_'
        } else if c.is_alphanumeric() || c == '-' {
            c
        } else {
            continue;
        };

        if mapped == '_' {
            if last_underscore {
                continue;
            }
            last_underscore = true;
        } else {
            last_underscore = false;
        }
        out.push(mapped);
    }

    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Generate a collision-resistant filename: `{sanitized}_{millis}_{token}.{ext}`
///
/// `extension` is given without the leading dot.
#[must_use]
pub fn unique_filename(base: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let token = random_token(5);
    let stem = sanitize_filename(base);
    if extension.is_empty() {
        format!("{stem}_{timestamp}_{token}")
    } else {
        format!("{stem}_{timestamp}_{token}.{extension}")
    }
}

/// Move a file, falling back to copy + delete when a rename is not possible
/// (e.g. across filesystems).
pub async fn move_file(source: &Path, destination: &Path) -> Result<()> {
    if tokio::fs::rename(source, destination).await.is_ok() {
        return Ok(());
    }

    tokio::fs::copy(source, destination).await.map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!(
                "failed to move {} to {}: {}",
                source.display(),
                destination.display(),
                e
            ),
        )
    })?;

    if let Err(e) = tokio::fs::remove_file(source).await {
        tracing::warn!(path = %source.display(), error = %e, "failed to remove source after copy");
    }
    Ok(())
}

/// Human-readable file size (`Bytes`, `KB`, `MB`, `GB`)
///
/// # Examples
///
/// ```
/// use playlist_dl::utils::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    let rounded = (size * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
