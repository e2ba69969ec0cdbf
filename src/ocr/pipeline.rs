//! Upload-to-text pipeline: decode, normalize, recognize, reject blanks.

use image::{ImageError, ImageFormat};
use thiserror::Error;

use super::backend::{OcrBackend, OcrBackendType, OcrError};
use super::decode::DecodedImage;

/// Message reported when the engine returns only whitespace.
pub const NO_TEXT_MESSAGE: &str = "No text found in image";

/// Number of characters of recognized text included in log previews.
const PREVIEW_CHARS: usize = 200;

/// Failure modes of [`extract_text`].
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bytes are not an image the decoder understands.
    #[error("{0}")]
    Decode(#[from] ImageError),

    /// The OCR engine failed to run or exited with an error.
    #[error("{0}")]
    Engine(#[from] OcrError),

    /// Decoding and OCR succeeded but produced blank output.
    #[error("No text found in image")]
    NoText,
}

/// Text recognized in a single image.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub backend: OcrBackendType,
    pub format: ImageFormat,
    pub processing_time_ms: u64,
}

/// Run the full pipeline on one uploaded image.
///
/// Blocks for as long as the engine takes; async callers should run this
/// on the blocking pool.
pub fn extract_text(
    backend: &dyn OcrBackend,
    bytes: &[u8],
) -> Result<ExtractedText, ExtractError> {
    let decoded = DecodedImage::decode(bytes)?;
    let format = decoded.format();
    tracing::info!(
        "Image loaded: {:?}, size: {}x{}, mode: {:?}",
        format,
        decoded.width(),
        decoded.height(),
        decoded.color()
    );

    if !decoded.is_rgb8() {
        tracing::debug!("Converting {:?} image to RGB", decoded.color());
    }
    let rgb = decoded.into_rgb8();

    tracing::info!("Starting OCR extraction with {}", backend.backend_type());
    let result = backend.ocr_image(&rgb)?;

    if result.text.trim().is_empty() {
        tracing::warn!("No text extracted from image");
        return Err(ExtractError::NoText);
    }

    tracing::info!(
        "OCR completed in {}ms. Text length: {}",
        result.processing_time_ms,
        result.text.chars().count()
    );
    tracing::info!("OCR preview: {}...", preview(&result.text));

    Ok(ExtractedText {
        text: result.text,
        backend: result.backend,
        format,
        processing_time_ms: result.processing_time_ms,
    })
}

/// First [`PREVIEW_CHARS`] characters of `text`, cut on a char boundary.
pub fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;

    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

    use super::*;

    /// Backend that records what it was given and replies with a canned answer.
    struct Scripted {
        reply: Result<&'static str, &'static str>,
        seen: Mutex<Vec<(u32, u32, Rgb<u8>)>>,
    }

    impl Scripted {
        fn text(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                reply: Err(message),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl OcrBackend for Scripted {
        fn backend_type(&self) -> OcrBackendType {
            OcrBackendType::Tesseract
        }

        fn is_available(&self) -> bool {
            true
        }

        fn availability_hint(&self) -> String {
            "scripted".to_string()
        }

        fn run_ocr(&self, image: &RgbImage) -> Result<String, OcrError> {
            self.seen
                .lock()
                .unwrap()
                .push((image.width(), image.height(), *image.get_pixel(0, 0)));
            self.reply
                .map(str::to_string)
                .map_err(|m| OcrError::OcrFailed(m.to_string()))
        }
    }

    fn png(image: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn white_png() -> Vec<u8> {
        png(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            20,
            10,
            Rgb([255, 255, 255]),
        )))
    }

    #[test]
    fn test_text_is_returned_verbatim() {
        let backend = Scripted::text("Masala Dosa ..... 120\nIdli ..... 60\n");
        let extracted = extract_text(&backend, &white_png()).unwrap();
        assert_eq!(extracted.text, "Masala Dosa ..... 120\nIdli ..... 60\n");
        assert_eq!(extracted.format, ImageFormat::Png);
        assert_eq!(extracted.backend, OcrBackendType::Tesseract);
    }

    #[test]
    fn test_blank_output_is_no_text() {
        for reply in ["", "   ", "\n\n", " \t\u{c}"] {
            let backend = Scripted::text(reply);
            let err = extract_text(&backend, &white_png()).unwrap_err();
            assert!(matches!(err, ExtractError::NoText), "reply {:?}", reply);
            assert_eq!(err.to_string(), NO_TEXT_MESSAGE);
        }
    }

    #[test]
    fn test_engine_failure_keeps_message() {
        let backend = Scripted::failing("engine crashed");
        let err = extract_text(&backend, &white_png()).unwrap_err();
        assert!(matches!(err, ExtractError::Engine(_)));
        assert!(err.to_string().contains("engine crashed"));
    }

    #[test]
    fn test_undecodable_bytes_never_reach_engine() {
        let backend = Scripted::text("unused");
        let err = extract_text(&backend, b"GIF-ish garbage").unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)));
        assert!(!err.to_string().is_empty());
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_engine_receives_rgb_pixels() {
        let mut rgba = RgbaImage::new(5, 3);
        rgba.put_pixel(0, 0, Rgba([9, 8, 7, 255]));
        let backend = Scripted::text("x");

        extract_text(&backend, &png(DynamicImage::ImageRgba8(rgba))).unwrap();

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[(5, 3, Rgb([9, 8, 7]))]);
    }

    #[test]
    fn test_same_bytes_give_same_result() {
        let backend = Scripted::text("Chai 20");
        let bytes = white_png();
        let first = extract_text(&backend, &bytes).unwrap();
        let second = extract_text(&backend, &bytes).unwrap();
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn test_preview_cuts_on_char_boundary() {
        let long = "₹".repeat(300);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), 200);
        assert_eq!(preview("short"), "short");
    }
}
