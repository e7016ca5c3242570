use super::Extractor;
use crate::config::PipelineConfig;
use crate::error::TextportError;
use crate::ocr;
use tracing::debug;

/// Raster images: decode, normalise to 8-bit RGB, run OCR.
///
/// The image is decoded before the engine is resolved, so an unreadable
/// buffer is reported as such even when no engine is installed.
pub struct ImageExtractor;

impl Extractor for ImageExtractor {
    fn name(&self) -> &'static str {
        "image"
    }

    fn extract(&self, bytes: &[u8], config: &PipelineConfig) -> Result<String, TextportError> {
        let decoded = ::image::load_from_memory(bytes).map_err(|e| TextportError::OcrFailed {
            detail: e.to_string(),
        })?;
        let rgb = decoded.to_rgb8();
        debug!("Decoded image {}x{} for OCR", rgb.width(), rgb.height());

        let backend = ocr::resolve_backend(config)?;
        backend.recognize(&rgb)
    }
}
