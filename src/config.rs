//! Configuration types for the extraction and rendering pipelines.
//!
//! All pipeline behaviour is controlled through [`PipelineConfig`], built via
//! its [`PipelineConfigBuilder`]. The config is immutable once built and is
//! shared by reference across requests; nothing in it is mutated per call.
//!
//! Units: page geometry is expressed in millimetres, font size in points.

use crate::error::TextportError;
use crate::ocr::OcrBackend;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Configuration shared by every extraction and rendering call.
///
/// # Example
/// ```rust
/// use textport::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .ocr_language("eng+deu")
///     .font_size_pt(11.0)
///     .build()
///     .unwrap();
/// assert_eq!(config.ocr.language, "eng+deu");
/// ```
#[derive(Clone, Default)]
pub struct PipelineConfig {
    /// Page geometry and character policy for PDF rendering.
    pub pdf: PdfLayout,

    /// How to locate and drive the OCR engine when no backend is injected.
    pub ocr: OcrSettings,

    /// Pre-initialised OCR engine. Takes precedence over `ocr`.
    ///
    /// Shells initialise the engine once at startup and pass the handle here;
    /// tests inject fakes.
    pub ocr_backend: Option<Arc<dyn OcrBackend>>,
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("pdf", &self.pdf)
            .field("ocr", &self.ocr)
            .field(
                "ocr_backend",
                &self.ocr_backend.as_ref().map(|_| "<dyn OcrBackend>"),
            )
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn font(mut self, font: BuiltinFont) -> Self {
        self.config.pdf.font = font;
        self
    }

    pub fn font_size_pt(mut self, size: f64) -> Self {
        self.config.pdf.font_size_pt = size;
        self
    }

    pub fn line_height_mm(mut self, h: f64) -> Self {
        self.config.pdf.line_height_mm = h;
        self
    }

    pub fn bottom_margin_mm(mut self, m: f64) -> Self {
        self.config.pdf.bottom_margin_mm = m;
        self
    }

    pub fn placeholder_char(mut self, c: char) -> Self {
        self.config.pdf.placeholder_char = c;
        self
    }

    pub fn omitted_line_text(mut self, text: impl Into<String>) -> Self {
        self.config.pdf.omitted_line_text = text.into();
        self
    }

    pub fn ocr_command(mut self, cmd: impl Into<String>) -> Self {
        self.config.ocr.command = cmd.into();
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr.language = lang.into();
        self
    }

    pub fn ocr_page_segmentation(mut self, psm: u8) -> Self {
        self.config.ocr.page_segmentation = Some(psm);
        self
    }

    pub fn ocr_backend(mut self, backend: Arc<dyn OcrBackend>) -> Self {
        self.config.ocr_backend = Some(backend);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, TextportError> {
        let p = &self.config.pdf;
        if p.line_height_mm <= 0.0 || p.font_size_pt <= 0.0 {
            return Err(TextportError::InvalidConfig(format!(
                "Line height and font size must be positive, got {} mm / {} pt",
                p.line_height_mm, p.font_size_pt
            )));
        }
        if p.bottom_margin_mm < 0.0 || p.bottom_margin_mm + p.margin_mm >= p.page_height_mm {
            return Err(TextportError::InvalidConfig(format!(
                "Bottom margin {} mm leaves no printable area",
                p.bottom_margin_mm
            )));
        }
        if !is_printable_ascii(p.placeholder_char) {
            return Err(TextportError::InvalidConfig(format!(
                "Placeholder must be printable ASCII, got {:?}",
                p.placeholder_char
            )));
        }
        let o = &self.config.ocr;
        if o.command.trim().is_empty() || o.language.trim().is_empty() {
            return Err(TextportError::InvalidConfig(
                "OCR command and language must be non-empty".into(),
            ));
        }
        if matches!(o.page_segmentation, Some(psm) if psm > 13) {
            return Err(TextportError::InvalidConfig(
                "OCR page segmentation mode must be 0–13".into(),
            ));
        }
        Ok(self.config)
    }
}

pub(crate) fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

// ── PDF layout ───────────────────────────────────────────────────────────

/// Page geometry and character policy for the PDF renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfLayout {
    /// Page width. Default: 210 (A4).
    pub page_width_mm: f64,
    /// Page height. Default: 297 (A4).
    pub page_height_mm: f64,
    /// Left, right and top margin. Default: 10.
    pub margin_mm: f64,
    /// A new page starts once the next line would cross this margin. Default: 15.
    pub bottom_margin_mm: f64,
    /// Vertical advance per rendered line. Default: 10.
    pub line_height_mm: f64,
    /// Default: 12.
    pub font_size_pt: f64,
    /// One of the standard PDF fonts; nothing is embedded. Default: Helvetica.
    pub font: BuiltinFont,
    /// Substituted for every character outside printable ASCII. Default: `'?'`.
    pub placeholder_char: char,
    /// Emitted in place of a line that could not be laid out.
    pub omitted_line_text: String,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 10.0,
            bottom_margin_mm: 15.0,
            line_height_mm: 10.0,
            font_size_pt: 12.0,
            font: BuiltinFont::default(),
            placeholder_char: '?',
            omitted_line_text: "[Content omitted due to encoding issues]".to_string(),
        }
    }
}

/// Standard Type 1 fonts every PDF viewer provides without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuiltinFont {
    #[default]
    Helvetica,
    Courier,
}

impl BuiltinFont {
    /// The `/BaseFont` name written into the font dictionary.
    pub fn base_font(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::Courier => "Courier",
        }
    }
}

// ── OCR ──────────────────────────────────────────────────────────────────

/// Settings for the tesseract engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Engine executable, looked up on `PATH` when not absolute. Default: `tesseract`.
    pub command: String,
    /// Language pack(s), `+`-separated. Default: `eng`.
    pub language: String,
    /// Page segmentation mode (`--psm`). Default: engine default.
    pub page_segmentation: Option<u8>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
            page_segmentation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_layout_policy() {
        let c = PipelineConfig::default();
        assert_eq!(c.pdf.bottom_margin_mm, 15.0);
        assert_eq!(c.pdf.line_height_mm, 10.0);
        assert_eq!(c.pdf.placeholder_char, '?');
        assert_eq!(c.ocr.command, "tesseract");
        assert!(c.ocr_backend.is_none());
    }

    #[test]
    fn builder_rejects_non_ascii_placeholder() {
        let err = PipelineConfig::builder()
            .placeholder_char('é')
            .build()
            .unwrap_err();
        assert!(matches!(err, TextportError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_zero_line_height() {
        assert!(PipelineConfig::builder().line_height_mm(0.0).build().is_err());
    }

    #[test]
    fn builder_rejects_oversized_bottom_margin() {
        assert!(PipelineConfig::builder()
            .bottom_margin_mm(400.0)
            .build()
            .is_err());
    }

    #[test]
    fn builder_rejects_empty_language() {
        assert!(PipelineConfig::builder().ocr_language(" ").build().is_err());
    }

    #[test]
    fn builder_accepts_space_placeholder() {
        let c = PipelineConfig::builder()
            .placeholder_char(' ')
            .ocr_page_segmentation(6)
            .build()
            .unwrap();
        assert_eq!(c.pdf.placeholder_char, ' ');
        assert_eq!(c.ocr.page_segmentation, Some(6));
    }

    #[test]
    fn debug_hides_backend() {
        let c = PipelineConfig::default();
        let s = format!("{c:?}");
        assert!(s.contains("ocr_backend: None"));
    }
}
