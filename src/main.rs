use std::sync::Arc;

use clap::Parser;
use sentiment_writer::config::Config;
use sentiment_writer::web::{app, AppState};
use sentiment_writer::writer::Writer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,hf_hub=warn,candle_core=warn,candle_nn=warn,candle_transformers=warn")
            }),
        )
        .init();

    let config = Config::parse();
    let settings = config.model_settings();
    info!(
        sentiment = %settings.sentiment.model_repo,
        generation = %settings.generation,
        device = ?settings.device,
        "loading models"
    );

    let writer = tokio::task::spawn_blocking(move || Writer::load(&settings)).await?;
    if let Some(reason) = writer.load_error() {
        warn!(%reason, "serving without models");
    }

    let state = AppState::new(Arc::new(writer))?;
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
