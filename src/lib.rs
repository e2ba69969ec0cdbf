//! Menu OCR - extract text from uploaded images over HTTP.
//!
//! Decodes an uploaded image, normalizes it to RGB, runs Tesseract on it
//! and wraps the result in a small JSON envelope.

pub mod cli;
pub mod config;
pub mod ocr;
pub mod server;
