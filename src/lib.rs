mod commands;
pub mod acquisition;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod mime_utils;
pub mod models;
pub mod render;
pub mod session;

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use commands::caption::{caption_api, health, index, read_inputs, submit_form};
pub use config::AppConfig;
pub use dispatcher::{generate, CaptionModel, GeminiCaptionModel};
pub use error::{AcquisitionError, CaptionError, FailureKind};
pub use models::{CaptionRequest, Image, ImageSource, RawImage, RawInputs, RequestShape};
pub use session::{Phase, Session};

/// Shared, read-only state for every request.
pub struct AppState {
    pub config: AppConfig,
    pub model: Arc<dyn CaptionModel>,
}

impl AppState {
    pub fn new(config: AppConfig, model: Arc<dyn CaptionModel>) -> Self {
        Self { config, model }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index).post(submit_form))
        .route("/api/caption", post(caption_api))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    logging::init();

    let config = AppConfig::from_env().context("Failed to read configuration")?;
    if config.api_key.is_none() {
        tracing::warn!(
            "{} is not set; caption requests will fail until it is configured",
            constants::API_KEY_ENV
        );
    }
    tracing::info!(model = %config.model, endpoint = %config.endpoint, "configured caption model");

    let model: Arc<dyn CaptionModel> = Arc::new(GeminiCaptionModel::from_config(&config));
    let bind_addr = config.bind_addr;
    let app = build_router(Arc::new(AppState::new(config, model)));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!("Image Captioner listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Image Captioner shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}
