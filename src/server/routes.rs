//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use super::handlers;
use super::openapi;
use super::AppState;
use crate::config::{ConfigError, ServerConfig};

/// Create the main router with all routes.
pub fn create_router(state: AppState, server: &ServerConfig) -> Result<Router, ConfigError> {
    let body_limit = match server.upload_limit_bytes {
        Some(bytes) => DefaultBodyLimit::max(bytes),
        None => DefaultBodyLimit::disable(),
    };

    Ok(Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/ocr", post(handlers::ocr_image))
        .route("/api/openapi.json", get(openapi::openapi_spec))
        .route("/openapi.json", get(openapi::openapi_spec))
        .layer(body_limit)
        .layer(cors_layer(&server.cors_origins)?)
        .with_state(state))
}

/// Build the CORS policy for the configured origins.
///
/// Credentials are allowed, so methods and headers mirror the preflight
/// request instead of answering with a wildcard. A `*` origin switches to
/// an any-origin policy without credentials.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    if origins.iter().any(|o| o.trim() == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = origins
        .iter()
        .map(|origin| {
            let origin = origin.trim().trim_end_matches('/');
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::InvalidOrigin(origin.to_string()));
            }
            HeaderValue::from_str(origin)
                .map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
