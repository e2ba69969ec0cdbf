//! HTTP handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::AppState;
use crate::ocr::{extract_text, ExtractError};

/// Greeting returned by `GET /`.
pub const SERVICE_MESSAGE: &str = "Menu OCR Service is running";

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "file";

/// Response for `GET /`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

/// Envelope for `POST /ocr`. Exactly one of `text` and `error` is present.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OcrResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OcrResponse {
    pub fn ok(text: String) -> Self {
        Self {
            success: true,
            text: Some(text),
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(error),
        }
    }
}

/// Multipart form accepted by `POST /ocr` (documentation only).
#[derive(ToSchema)]
pub struct OcrUpload {
    /// Image file (PNG, JPEG, WebP, ...).
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// A file received in the multipart body.
#[derive(Debug)]
pub struct Upload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Errors surfaced by `POST /ocr`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body was not a usable multipart upload.
    #[error("{0}")]
    Upload(String),

    /// Decoding or recognition failed, or nothing was recognized.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The blocking OCR task panicked or was cancelled.
    #[error("OCR worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// Only an empty recognition result is the caller's problem; everything
    /// else is reported as a server failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Extract(ExtractError::NoText) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Error processing image: {}", self);
        }
        (status, Json(OcrResponse::failure(self.to_string()))).into_response()
    }
}

/// Service greeting.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = RootResponse)
    ),
    tag = "Service"
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_MESSAGE.to_string(),
    })
}

/// Health check endpoint for container orchestration.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy")
    ),
    tag = "Service"
)]
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Extract text from an uploaded image.
#[utoipa::path(
    post,
    path = "/ocr",
    request_body(content = OcrUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Text extracted", body = OcrResponse),
        (status = 400, description = "No text found in image", body = OcrResponse),
        (status = 500, description = "Upload, decoding or OCR failure", body = OcrResponse)
    ),
    tag = "OCR"
)]
pub async fn ocr_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::Upload(e.body_text()))?;
    let upload = read_upload(&mut multipart).await?;

    tracing::info!(
        "Processing image: {}, size: {} bytes, type: {}",
        upload.filename.as_deref().unwrap_or("<unnamed>"),
        upload.bytes.len(),
        upload.content_type.as_deref().unwrap_or("unknown")
    );

    let backend = Arc::clone(&state.ocr);
    let extracted =
        tokio::task::spawn_blocking(move || extract_text(backend.as_ref(), &upload.bytes))
            .await??;

    tracing::debug!(
        "{} read {:?} upload in {}ms",
        extracted.backend,
        extracted.format,
        extracted.processing_time_ms
    );
    Ok(Json(OcrResponse::ok(extracted.text)))
}

/// Read the [`UPLOAD_FIELD`] part into memory, skipping any other fields.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Upload(e.body_text()))?;

        return Ok(Upload {
            filename,
            content_type,
            bytes,
        });
    }

    Err(ApiError::Upload(format!(
        "Missing multipart field '{}'",
        UPLOAD_FIELD
    )))
}
