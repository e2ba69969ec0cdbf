//! OCR backend abstraction.
//!
//! Backends receive an already-normalized RGB bitmap and return the raw
//! text the engine produced. Decoding and empty-result handling live in
//! [`super::pipeline`].

use std::time::Instant;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page segmentation mode that treats the image as one uniform block of text.
pub const UNIFORM_BLOCK_PSM: u8 = 6;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(String),
}

/// Result of OCR processing.
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// Extracted text content, exactly as the engine produced it.
    pub text: String,
    /// Which backend produced this result.
    pub backend: OcrBackendType,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Available OCR backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OcrBackendType {
    /// Tesseract OCR via command-line.
    Tesseract,
}

impl OcrBackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrBackendType::Tesseract => "tesseract",
        }
    }
}

impl std::fmt::Display for OcrBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Get the backend type.
    fn backend_type(&self) -> OcrBackendType;

    /// Check if this backend is available (engine installed).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Core OCR: extract text from an RGB bitmap.
    fn run_ocr(&self, image: &RgbImage) -> Result<String, OcrError>;

    /// Run OCR on a bitmap, returning a timed result.
    fn ocr_image(&self, image: &RgbImage) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let text = self.run_ocr(image)?;
        Ok(OcrResult {
            text,
            backend: self.backend_type(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Engine configuration, fixed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language for OCR (e.g., "eng", "deu").
    pub language: String,
    /// Tesseract page segmentation mode.
    pub page_segmentation_mode: u8,
    /// Engine executable name or path.
    pub command: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            page_segmentation_mode: UNIFORM_BLOCK_PSM,
            command: "tesseract".to_string(),
        }
    }
}
