//! Rendering dispatcher: choose a strategy from the target format and run it.
//!
//! Strategies return raw bytes; the dispatcher wraps them in a
//! [`RenderedArtifact`] tagged with the format. Empty text is accepted and
//! yields a valid, contentless document.

mod docx;
mod pdf;
mod text;

pub use self::docx::DocxRenderer;
pub use self::pdf::PdfRenderer;
pub use self::text::TextRenderer;

use crate::config::PipelineConfig;
use crate::error::TextportError;
use crate::output::{RenderedArtifact, TargetFormat};
use tracing::debug;

/// A format-specific way of turning text into a document.
pub trait Renderer: Send + Sync {
    /// Human-readable format name used in error messages, e.g. `"PDF"`.
    fn name(&self) -> &'static str;

    fn render(&self, text: &str, config: &PipelineConfig) -> Result<Vec<u8>, TextportError>;
}

/// Target format → strategy.
static STRATEGIES: &[(TargetFormat, &dyn Renderer)] = &[
    (TargetFormat::Txt, &TextRenderer),
    (TargetFormat::Pdf, &PdfRenderer),
    (TargetFormat::Doc, &DocxRenderer),
];

pub fn strategy_for(format: TargetFormat) -> Result<&'static dyn Renderer, TextportError> {
    STRATEGIES
        .iter()
        .find(|(f, _)| *f == format)
        .map(|(_, strategy)| *strategy)
        .ok_or_else(|| TextportError::unsupported(format.tag()))
}

/// Render `text` into `format`.
pub fn render(
    text: &str,
    format: TargetFormat,
    config: &PipelineConfig,
) -> Result<RenderedArtifact, TextportError> {
    let strategy = strategy_for(format)?;
    let bytes = strategy.render(text, config)?;
    debug!(
        "Rendered {} chars as {} → {} bytes",
        text.chars().count(),
        strategy.name(),
        bytes.len()
    );
    Ok(RenderedArtifact::new(bytes, format))
}

/// Like [`render`], with the format given as its wire tag (`txt`, `pdf`, `doc`).
///
/// An unknown tag fails with [`TextportError::UnsupportedFormat`] before any
/// strategy runs.
pub fn render_tag(
    text: &str,
    tag: &str,
    config: &PipelineConfig,
) -> Result<RenderedArtifact, TextportError> {
    let format: TargetFormat = tag.parse()?;
    render(text, format, config)
}

/// Split on `\n`, dropping a trailing `\r` from each line.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}
