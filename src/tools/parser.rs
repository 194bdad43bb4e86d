//! Parsing of the tool's newline-delimited JSON search output

use super::traits::SearchRecord;
use crate::error::{Result, SongError};

/// Parse one JSON record per non-blank line.
///
/// Empty output is a valid "no results" answer.
pub(crate) fn parse_search_output(stdout: &[u8]) -> Result<Vec<SearchRecord>> {
    let text = String::from_utf8_lossy(stdout);

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str::<SearchRecord>(line).map_err(|e| {
                SongError::ToolUnavailable(format!("failed to parse search results: {e}")).into()
            })
        })
        .collect()
}

/// Last non-empty stderr line, for compact error messages
pub(crate) fn stderr_summary(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .unwrap_or("no error output")
        .to_string()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const RECORD: &str = r#"{"id":"abc123","title":"Artist A - Song A (Official Audio)","webpage_url":"https://www.youtube.com/watch?v=abc123","duration_string":"3:45","thumbnail":"https://i.ytimg.com/vi/abc123/hq.jpg","view_count":10}"#;

    #[test]
    fn parses_single_record_and_ignores_unknown_fields() {
        let records = parse_search_output(format!("{RECORD}\n").as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "abc123");
        assert_eq!(records[0].url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(records[0].duration.as_deref(), Some("3:45"));
    }

    #[test]
    fn empty_output_is_no_results() {
        assert!(parse_search_output(b"").unwrap().is_empty());
        assert!(parse_search_output(b"\n  \n").unwrap().is_empty());
    }

    #[test]
    fn missing_optional_fields_are_none() {
        let line = r#"{"id":"x","title":"t","webpage_url":"https://e/x"}"#;
        let records = parse_search_output(line.as_bytes()).unwrap();
        assert!(records[0].duration.is_none());
        assert!(records[0].thumbnail.is_none());
    }

    #[test]
    fn garbage_output_is_tool_unavailable() {
        let err = parse_search_output(b"ERROR: something\n").unwrap_err();
        assert!(matches!(err, Error::Song(SongError::ToolUnavailable(_))));
    }

    #[test]
    fn stderr_summary_takes_last_line() {
        assert_eq!(
            stderr_summary(b"WARNING: a\nERROR: Video unavailable\n\n"),
            "ERROR: Video unavailable"
        );
        assert_eq!(stderr_summary(b""), "no error output");
    }
}
