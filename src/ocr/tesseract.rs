//! Tesseract OCR backend implementation.
//!
//! Uses Tesseract OCR via command-line for text extraction. The bitmap is
//! written to a temporary PNG and the recognized text is read from stdout.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use image::{ImageFormat, RgbImage};
use tempfile::TempDir;

use super::backend::{OcrBackend, OcrBackendType, OcrConfig, OcrError};

/// Tesseract OCR backend.
pub struct TesseractBackend {
    config: OcrConfig,
}

impl TesseractBackend {
    /// Create a new Tesseract backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: OcrConfig::default(),
        }
    }

    /// Create a new Tesseract backend with custom configuration.
    pub fn with_config(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Command-line arguments for recognizing `image_path` to stdout.
    fn args(&self, image_path: &Path) -> Vec<OsString> {
        vec![
            image_path.as_os_str().to_owned(),
            "stdout".into(),
            "-l".into(),
            self.config.language.clone().into(),
            "--psm".into(),
            self.config.page_segmentation_mode.to_string().into(),
        ]
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.config.command)
            .args(self.args(image_path))
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::OcrFailed(format!(
                        "{} exited with {}: {}",
                        self.config.command,
                        output.status,
                        stderr.trim()
                    )))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(format!(
                    "{} not found (install tesseract-ocr)",
                    self.config.command
                )))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Tesseract
    }

    fn is_available(&self) -> bool {
        which::which(&self.config.command).is_ok()
    }

    fn availability_hint(&self) -> String {
        if self.is_available() {
            "Tesseract is available".to_string()
        } else {
            format!(
                "{} not found in PATH. Install with: apt install tesseract-ocr",
                self.config.command
            )
        }
    }

    fn run_ocr(&self, image: &RgbImage) -> Result<String, OcrError> {
        let temp_dir = TempDir::new()?;
        let image_path = temp_dir.path().join("upload.png");
        image
            .save_with_format(&image_path, ImageFormat::Png)
            .map_err(|e| OcrError::ImageError(e.to_string()))?;

        self.run_tesseract(&image_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_request_stdout_language_and_psm() {
        let backend = TesseractBackend::new();
        let args = backend.args(Path::new("/tmp/menu.png"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();
        assert_eq!(
            args,
            ["/tmp/menu.png", "stdout", "-l", "eng", "--psm", "6"]
        );
    }

    #[test]
    fn test_args_follow_config() {
        let backend = TesseractBackend::with_config(OcrConfig {
            language: "hin+eng".to_string(),
            page_segmentation_mode: 4,
            ..OcrConfig::default()
        });
        let args = backend.args(Path::new("x.png"));
        assert_eq!(args[3], OsString::from("hin+eng"));
        assert_eq!(args[5], OsString::from("4"));
    }

    #[test]
    fn test_missing_executable_is_reported_as_unavailable() {
        let backend = TesseractBackend::with_config(OcrConfig {
            command: "menu-ocr-no-such-tesseract".to_string(),
            ..OcrConfig::default()
        });
        assert!(!backend.is_available());
        assert!(backend.availability_hint().contains("not found"));

        let err = backend.run_ocr(&RgbImage::new(8, 8)).unwrap_err();
        assert!(matches!(err, OcrError::BackendNotAvailable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_ocr_failure() {
        let backend = TesseractBackend::with_config(OcrConfig {
            command: "false".to_string(),
            ..OcrConfig::default()
        });
        let err = backend.run_ocr(&RgbImage::new(8, 8)).unwrap_err();
        match err {
            OcrError::OcrFailed(message) => {
                assert!(message.starts_with("false exited with"), "{}", message);
                assert!(message.contains("exit status: 1"), "{}", message);
            }
            other => panic!("expected OcrFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_is_returned_as_text() {
        let backend = TesseractBackend::with_config(OcrConfig {
            command: "echo".to_string(),
            ..OcrConfig::default()
        });
        let text = backend.run_ocr(&RgbImage::new(8, 8)).unwrap();
        assert!(text.ends_with("upload.png stdout -l eng --psm 6\n"), "{:?}", text);
    }
}
