//! Engine availability check.

use console::style;

use crate::config::Config;
use crate::ocr::{OcrBackend, TesseractBackend};

pub fn cmd_check(config: &Config) -> anyhow::Result<()> {
    let backend = TesseractBackend::with_config(config.ocr.clone());

    if backend.is_available() {
        println!(
            "{} {} (language: {}, psm: {})",
            style("✓").green(),
            backend.availability_hint(),
            config.ocr.language,
            config.ocr.page_segmentation_mode
        );
        Ok(())
    } else {
        eprintln!("{} {}", style("✗").red(), backend.availability_hint());
        anyhow::bail!("{} backend unavailable", backend.backend_type())
    }
}
