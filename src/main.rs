use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use voicejot::http::{ClientConfig, RateLimitInfo};
use voicejot::summary::{OpenAiProvider, SummaryService};
use voicejot::{create_router, AppState, BlobStore, Config, RecordingStore};

#[derive(Debug, Parser)]
#[command(name = "voicejot", about = "Voice-note recording and summary service")]
struct Args {
    /// Config file base name (without extension)
    #[arg(long, default_value = "config/voicejot")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);

    let recordings = RecordingStore::open(&cfg.storage.metadata_path)?;
    let blobs = BlobStore::open(&cfg.storage.uploads_path)?;

    let provider = Arc::new(OpenAiProvider::from_config(&cfg.summary)?);
    let summaries = Arc::new(SummaryService::from_config(
        provider,
        recordings.clone(),
        &cfg.summary,
    ));

    let client_config = ClientConfig {
        max_upload_bytes: cfg.storage.max_upload_bytes,
        summary_enabled: true,
        summary_rate_limit: RateLimitInfo {
            window_secs: cfg.summary.rate_limit_window_secs,
            max_requests: cfg.summary.rate_limit_max,
        },
    };

    let state = AppState::new(recordings, blobs, summaries, client_config);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {}", e);
        return;
    }
    info!("Shutdown signal received, closing server");
}
