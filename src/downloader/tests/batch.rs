use crate::Error;
use crate::downloader::test_helpers::{
    ScriptedBackend, StaticMetadata, create_test_downloader, test_config,
};
use crate::downloader::{DEFAULT_COLLECTION_NAME, PlaylistDownloader};
use crate::error::SongError;
use crate::tools::UnavailableBackend;
use crate::types::{BatchRequest, BatchStatus, SongInput, SongStatus};
use std::io::Read;
use std::sync::Arc;

fn request(n: usize) -> BatchRequest {
    BatchRequest {
        songs: (1..=n)
            .map(|i| SongInput::new(format!("Song {i}"), format!("Artist {i}")))
            .collect(),
        collection_name: Some("Road Trip".into()),
        create_archive: Some(false),
    }
}

fn entries_in(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn single_song_batch_completes_with_download_url() {
    let (downloader, _backend, _dir) = create_test_downloader(ScriptedBackend::new());

    let batch = downloader
        .download_batch(BatchRequest {
            songs: vec![SongInput::new("Song A", "Artist A")],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(batch.overall_status, BatchStatus::Completed);
    assert_eq!(batch.collection_name, DEFAULT_COLLECTION_NAME);
    let song = &batch.songs[0];
    assert_eq!(song.status, SongStatus::Completed);
    assert_eq!(song.progress, 100);
    assert!(!song.download_url.as_deref().unwrap().is_empty());
}

#[tokio::test]
async fn partial_failure_is_reported_per_song() {
    let (downloader, _backend, _dir) =
        create_test_downloader(ScriptedBackend::new().without_results_for("Song 3"));

    let batch = downloader.download_batch(request(5)).await.unwrap();

    assert_eq!(batch.completed_songs, 4);
    assert_eq!(batch.failed_songs, 1);
    assert_eq!(batch.completed_songs + batch.failed_songs, batch.total_songs);
    assert_eq!(batch.songs[2].status, SongStatus::Error);
    assert_eq!(batch.summary(), "4 songs downloaded successfully, 1 failed.");
}

#[tokio::test]
async fn empty_request_is_rejected_before_any_work() {
    let (downloader, backend, dir) = create_test_downloader(ScriptedBackend::new());

    let err = downloader.download_batch(BatchRequest::default()).await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(backend.events().is_empty());
    assert!(!dir.path().join("temp").exists());
}

#[tokio::test]
async fn request_without_valid_songs_is_rejected() {
    let (downloader, backend, _dir) = create_test_downloader(ScriptedBackend::new());

    let err = downloader
        .download_batch(BatchRequest {
            songs: vec![SongInput {
                title: Some("only a title".into()),
                ..Default::default()
            }],
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(backend.searched_queries().is_empty());
}

#[tokio::test]
async fn invalid_entries_are_dropped() {
    let (downloader, _backend, _dir) = create_test_downloader(ScriptedBackend::new());
    let mut req = request(2);
    req.songs.insert(1, SongInput::default());

    let batch = downloader.download_batch(req).await.unwrap();

    assert_eq!(batch.total_songs, 2);
    assert_eq!(batch.completed_songs, 2);
}

#[tokio::test]
async fn missing_tool_rejects_batch_before_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = PlaylistDownloader::with_components(
        test_config(dir.path()),
        Arc::new(UnavailableBackend),
        Arc::new(StaticMetadata(None)),
    );

    let err = downloader.download_batch(request(2)).await.unwrap_err();

    assert!(matches!(err, Error::Song(SongError::ToolUnavailable(_))));
    assert!(!dir.path().join("temp").exists());
}

#[tokio::test]
async fn workspace_is_removed_after_batch() {
    let (downloader, _backend, dir) = create_test_downloader(ScriptedBackend::new());

    downloader.download_batch(request(3)).await.unwrap();

    assert_eq!(entries_in(&dir.path().join("temp")), 0);
    assert_eq!(entries_in(&dir.path().join("downloads")), 3);
}

#[tokio::test]
async fn archive_contains_completed_songs_only() {
    let (downloader, _backend, dir) =
        create_test_downloader(ScriptedBackend::new().without_results_for("Song 2"));
    let mut req = request(3);
    req.create_archive = Some(true);

    let batch = downloader.download_batch(req).await.unwrap();

    let archive = batch.archive.clone().unwrap();
    assert_eq!(batch.archive_url.as_deref(), Some(archive.url.as_str()));
    assert_eq!(archive.mime_type, "application/zip");
    assert!(archive.filename.starts_with("Road_Trip_"));
    assert!(archive.size > 0);

    let file = std::fs::File::open(dir.path().join("downloads").join(&archive.filename)).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    let mut names: Vec<_> = zip.file_names().map(String::from).collect();
    names.sort();
    assert_eq!(
        names,
        vec!["01 - Artist_1_-_Song_1.mp3", "03 - Artist_3_-_Song_3.mp3"]
    );
    let mut contents = String::new();
    zip.by_name("03 - Artist_3_-_Song_3.mp3")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "fake audio for artist-3-song-3");
}

#[tokio::test]
async fn no_archive_when_every_song_failed() {
    let (downloader, _backend, _dir) =
        create_test_downloader(ScriptedBackend::new().without_results_for("Song"));
    let mut req = request(2);
    req.create_archive = Some(true);

    let batch = downloader.download_batch(req).await.unwrap();

    assert_eq!(batch.overall_status, BatchStatus::Completed);
    assert_eq!(batch.failed_songs, 2);
    assert!(batch.archive_url.is_none());
    assert!(batch.archive_error.is_none());
}

#[tokio::test]
async fn served_file_resolves_completed_download() {
    let (downloader, _backend, _dir) = create_test_downloader(ScriptedBackend::new());
    let batch = downloader.download_batch(request(1)).await.unwrap();
    let handle = batch.songs[0].download.clone().unwrap();

    let served = downloader.served_file(&handle.filename).await.unwrap();

    assert_eq!(served.mime_type, "audio/mpeg");
    assert_eq!(served.size, handle.size);
}

#[tokio::test]
async fn retention_sweep_removes_expired_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.download.retention_hours = 0;
    let downloader = PlaylistDownloader::with_components(
        config,
        Arc::new(ScriptedBackend::new()),
        Arc::new(StaticMetadata(None)),
    );
    downloader.download_batch(request(2)).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    assert_eq!(downloader.sweep_expired_files().await, 2);
    assert_eq!(entries_in(&dir.path().join("downloads")), 0);
}
