//! OpenAPI spec generation and serving.

use axum::{http::StatusCode, response::IntoResponse};
use utoipa::OpenApi;

use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Menu OCR Service",
        description = "Extract text from uploaded menu images"
    ),
    paths(handlers::root, handlers::health, handlers::ocr_image),
    components(schemas(handlers::RootResponse, handlers::OcrResponse, handlers::OcrUpload)),
    tags(
        (name = "Service", description = "Service status"),
        (name = "OCR", description = "Image text extraction"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI spec as JSON.
pub async fn openapi_spec() -> impl IntoResponse {
    let spec = ApiDoc::openapi()
        .to_json()
        .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
    (StatusCode::OK, [("content-type", "application/json")], spec)
}
