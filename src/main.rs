// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use region_ocr::{
    api::{start_server, AppState},
    cli::Cli,
    version,
    vision::OcrEngineManager,
};
use std::{env, sync::Arc};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = Cli::parse()
        .into_config()
        .context("Failed to load configuration")?;

    info!("🚀 Starting {}", version::get_version_string());
    info!(
        "OCR engine: lang={}, psm={}, region policy={:?}",
        config.ocr.lang, config.ocr.psm, config.ocr.region_policy
    );

    // Engine probing shells out to tesseract; keep it off the async workers
    let ocr_config = config.ocr.clone();
    let engine_manager = tokio::task::spawn_blocking(move || OcrEngineManager::new(ocr_config))
        .await
        .context("OCR engine initialization panicked")?;
    if !engine_manager.has_engine() {
        warn!("⚠️ No OCR engine available; /process will answer 503 until tesseract is installed");
    }

    if !config.server.static_dir.join("index.html").exists() {
        warn!(
            "No index.html in static dir {}; GET / will return 404",
            config.server.static_dir.display()
        );
    }

    let state = AppState::new(Arc::new(engine_manager), &config);
    start_server(&config, state, shutdown_signal()).await?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler the server runs until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
