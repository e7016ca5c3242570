//! Extraction dispatcher: choose a strategy from the file name and run it.
//!
//! The dispatcher performs no transformation of its own beyond the
//! [`ExtractedText`] normalisation (line breaks folded to `\n`, trimmed).

mod docx;
mod image;
mod pdf;
mod text;

pub use self::docx::DocxExtractor;
pub use self::image::ImageExtractor;
pub use self::pdf::PdfExtractor;
pub use self::text::TextExtractor;

use crate::config::PipelineConfig;
use crate::document::{ExtractedText, SourceDocument};
use crate::error::TextportError;
use tracing::debug;

/// A format-specific way of pulling text out of a byte buffer.
pub trait Extractor: Send + Sync {
    /// Human-readable format name used in error messages, e.g. `"PDF"`.
    fn name(&self) -> &'static str;

    /// Raw text of the document. Normalisation happens in the dispatcher.
    fn extract(&self, bytes: &[u8], config: &PipelineConfig) -> Result<String, TextportError>;
}

/// Lower-case file suffix → strategy.
static STRATEGIES: &[(&str, &dyn Extractor)] = &[
    (".pdf", &PdfExtractor),
    (".docx", &DocxExtractor),
    (".txt", &TextExtractor),
    (".png", &ImageExtractor),
    (".jpg", &ImageExtractor),
    (".jpeg", &ImageExtractor),
    (".bmp", &ImageExtractor),
    (".tiff", &ImageExtractor),
];

/// Suffixes accepted for extraction, in table order.
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    STRATEGIES.iter().map(|(ext, _)| *ext)
}

/// Find the strategy for `filename`, matching its lower-cased suffix.
///
/// Fails with [`TextportError::UnsupportedFormat`] naming the extension
/// (or the whole name when it has none).
pub fn strategy_for(filename: &str) -> Result<&'static dyn Extractor, TextportError> {
    let lowered = filename.to_lowercase();
    STRATEGIES
        .iter()
        .find(|(ext, _)| lowered.ends_with(ext))
        .map(|(_, strategy)| *strategy)
        .ok_or_else(|| TextportError::unsupported(offending_extension(&lowered)))
}

fn offending_extension(lowered: &str) -> &str {
    let base = lowered.rsplit(['/', '\\']).next().unwrap_or(lowered);
    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => base,
    }
}

/// Extract normalised text from an uploaded document.
pub fn extract(
    document: &SourceDocument<'_>,
    config: &PipelineConfig,
) -> Result<ExtractedText, TextportError> {
    let strategy = strategy_for(document.filename)?;
    debug!(
        "Extracting '{}' ({} bytes) as {}",
        document.filename,
        document.bytes.len(),
        strategy.name()
    );
    let raw = strategy.extract(document.bytes, config)?;
    Ok(ExtractedText::new(&raw))
}
