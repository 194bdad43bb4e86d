//! REST API server example
//!
//! Runs playlist-dl with the REST API enabled. Configuration comes from the
//! environment (`MAX_CONCURRENT_DOWNLOADS`, `PUBLIC_BASE_URL`,
//! `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, `YT_DLP_PATH`, ...).
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:3000/swagger-ui
//! - Extract playlist metadata via POST http://localhost:3000/api/v1/metadata/extract
//! - Download a batch via POST http://localhost:3000/api/v1/downloads/batch

use std::sync::Arc;
use playlist_dl::config::Config;
use playlist_dl::{PlaylistDownloader, run_with_shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let mut config = Config::from_env()?;
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    config.server.api.swagger_ui = true;

    let downloader = Arc::new(PlaylistDownloader::new(config.clone())?);
    let config_arc = Arc::new(config);

    let base = &config_arc.server.api.public_base_url;
    println!("🚀 Starting playlist-dl REST API server");
    println!("📖 Swagger UI: {base}/swagger-ui");
    println!("📡 API Base: {base}/api/v1");
    println!();
    println!("Example commands:");
    println!("  # Resolve a playlist");
    println!("  curl -X POST {base}/api/v1/metadata/extract \\");
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"url\": \"https://open.spotify.com/playlist/<id>\"}}'");
    println!();
    println!("  # Download two songs as a zip");
    println!("  curl -X POST {base}/api/v1/downloads/batch \\");
    println!("    -H 'Content-Type: application/json' \\");
    println!(
        "    -d '{{\"songs\": [{{\"title\": \"Song A\", \"artist\": \"Artist A\"}}, {{\"title\": \"Song B\", \"artist\": \"Artist B\"}}], \"create_archive\": true}}'"
    );

    // Runs until SIGINT/SIGTERM, expiring old served files meanwhile
    run_with_shutdown(downloader, config_arc).await?;

    Ok(())
}
