use super::*;
use crate::downloader::test_helpers::{ScriptedBackend, StaticMetadata, test_config};
use crate::error::ApiError;
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use std::time::Duration;
use tower::ServiceExt;


/// Router over a scripted backend; the tempdir must be kept alive.
fn test_app(backend: ScriptedBackend) -> (Router, Arc<Config>, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = Arc::new(test_config(temp_dir.path()));
    let downloader = Arc::new(PlaylistDownloader::with_components(
        (*config).clone(),
        Arc::new(backend),
        Arc::new(StaticMetadata(Some(
            crate::downloader::test_helpers::playlist_metadata(2),
        ))),
    ));
    (create_router(downloader, config.clone()), config, temp_dir)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn error_body(response: Response) -> ApiError {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn api_server_spawns_and_stops_on_shutdown_signal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = test_config(temp_dir.path());
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);
    let downloader = Arc::new(PlaylistDownloader::with_components(
        (*config).clone(),
        Arc::new(ScriptedBackend::new()),
        Arc::new(StaticMetadata(None)),
    ));

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(serve(downloader, config, async {
        let _ = rx.await;
    }));

    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn cors_headers_present_when_enabled() {
    let (_, config, _dir) = test_app(ScriptedBackend::new());
    let mut config = (*config).clone();
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    let downloader = Arc::new(PlaylistDownloader::with_components(
        config.clone(),
        Arc::new(ScriptedBackend::new()),
        Arc::new(StaticMetadata(None)),
    ));
    let app = create_router(downloader, Arc::new(config));

    let request = Request::builder()
        .uri("/api/v1/health")
        .header("Origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (app, _config, _dir) = test_app(ScriptedBackend::new());
    let response = app.oneshot(get("/api/v1/queue")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
