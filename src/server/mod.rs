//! Web server exposing OCR over HTTP.
//!
//! Routes:
//! - `GET /` greeting
//! - `GET /health` liveness probe
//! - `POST /ocr` multipart image upload, returns extracted text
//! - `GET /api/openapi.json` OpenAPI document (also at `/openapi.json`)

mod handlers;
mod openapi;
mod routes;

pub use handlers::{
    ApiError, OcrResponse, RootResponse, Upload, SERVICE_MESSAGE, UPLOAD_FIELD,
};
pub use openapi::ApiDoc;
pub use routes::{cors_layer, create_router};

use std::sync::Arc;

use crate::config::Config;
use crate::ocr::{OcrBackend, TesseractBackend};

/// Shared state for the web server. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub ocr: Arc<dyn OcrBackend>,
}

impl AppState {
    pub fn new(ocr: Arc<dyn OcrBackend>) -> Self {
        Self { ocr }
    }

    /// State backed by Tesseract with the configured engine settings.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(TesseractBackend::with_config(config.ocr.clone())))
    }
}

/// Start the web server and run until Ctrl+C.
pub async fn serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::from_config(config);
    if !state.ocr.is_available() {
        tracing::warn!("{}", state.ocr.availability_hint());
    }

    let app = create_router(state, &config.server)?;

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Starting server at http://{}", listener.local_addr()?);
    tracing::info!("CORS origins: {}", config.server.cors_origins.join(", "));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutting down");
    }
}
