use super::Extractor;
use crate::config::PipelineConfig;
use crate::error::TextportError;
use lopdf::Document;
use tracing::debug;

/// `.pdf`: read the text layer of every page, in page order.
///
/// A page whose text cannot be read (scanned image, unsupported content
/// stream) contributes an empty segment. Only a buffer that does not parse
/// as a PDF at all is an error.
pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "PDF"
    }

    fn extract(&self, bytes: &[u8], _config: &PipelineConfig) -> Result<String, TextportError> {
        let document = Document::load_mem(bytes).map_err(|e| TextportError::ExtractionFailed {
            format: self.name(),
            detail: e.to_string(),
        })?;

        let pages = document.get_pages();
        debug!("PDF loaded: {} pages", pages.len());

        let mut segments = Vec::with_capacity(pages.len());
        for &page_num in pages.keys() {
            let text = match document.extract_text(&[page_num]) {
                Ok(t) => t,
                Err(e) => {
                    debug!("Page {}: no readable text layer ({})", page_num, e);
                    String::new()
                }
            };
            // lopdf closes every text object with a newline; pages are joined below
            segments.push(text.trim_end_matches('\n').to_string());
        }

        Ok(segments.join("\n"))
    }
}
