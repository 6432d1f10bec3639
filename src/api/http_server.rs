// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{future::Future, path::PathBuf, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::process::process_handler;
use crate::config::ServiceConfig;
use crate::version;
use crate::vision::{EngineInfo, OcrEngineManager};

/// Room for multipart boundaries, part headers and the `crop_areas` field
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Request body limit for a given image size limit
pub fn body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)
}

#[derive(Clone)]
pub struct AppState {
    pub engine_manager: Arc<OcrEngineManager>,
    pub max_upload_bytes: usize,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(engine_manager: Arc<OcrEngineManager>, config: &ServiceConfig) -> Self {
        Self {
            engine_manager,
            max_upload_bytes: config.server.max_upload_bytes,
            static_dir: config.server.static_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engine: EngineInfo,
}

pub fn create_app(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();

    Router::new()
        .route("/health", get(health_handler))
        .route("/process", post(process_handler))
        // Operator front-end bundle; any other GET is looked up in the static dir
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(&static_dir))
        .fallback_service(ServeDir::new(&static_dir))
        .layer(DefaultBodyLimit::max(body_limit(state.max_upload_bytes)))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server<F>(
    config: &ServiceConfig,
    state: AppState,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr()?;
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: version::VERSION.to_string(),
        engine: state.engine_manager.engine_info(),
    })
}
