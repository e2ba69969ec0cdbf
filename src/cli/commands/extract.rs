//! Local OCR command.

use std::path::Path;

use anyhow::Context;

use crate::config::Config;
use crate::ocr::{extract_text, TesseractBackend};

/// Run the upload pipeline on a file and print the recognized text.
pub async fn cmd_ocr(config: &Config, path: &Path) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let backend = TesseractBackend::with_config(config.ocr.clone());
    let extracted = tokio::task::spawn_blocking(move || extract_text(&backend, &bytes)).await??;

    tracing::info!(
        "{} read {} ({:?}) in {}ms",
        extracted.backend,
        path.display(),
        extracted.format,
        extracted.processing_time_ms
    );
    print!("{}", extracted.text);
    Ok(())
}
