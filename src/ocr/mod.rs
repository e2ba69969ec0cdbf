//! OCR module.
//!
//! Turns uploaded image bytes into text:
//! - `decode`: format detection, decoding and RGB normalization (image crate)
//! - `tesseract`: Tesseract OCR via its command-line executable
//! - `pipeline`: the end-to-end extraction with an explicit error type
//!
//! Engines plug in through [`OcrBackend`], so the HTTP layer and tests do
//! not depend on Tesseract being installed.

mod backend;
mod decode;
mod pipeline;
mod tesseract;

pub use backend::{OcrBackend, OcrBackendType, OcrConfig, OcrError, OcrResult, UNIFORM_BLOCK_PSM};
pub use decode::DecodedImage;
pub use pipeline::{extract_text, preview, ExtractError, ExtractedText, NO_TEXT_MESSAGE};
pub use tesseract::TesseractBackend;
