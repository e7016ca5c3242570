use super::Extractor;
use crate::config::PipelineConfig;
use crate::error::TextportError;

/// `.txt`: strict UTF-8 decode. A leading byte-order mark is dropped.
pub struct TextExtractor;

impl Extractor for TextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, bytes: &[u8], _config: &PipelineConfig) -> Result<String, TextportError> {
        let text = std::str::from_utf8(bytes).map_err(|e| TextportError::InvalidEncoding {
            valid_up_to: e.valid_up_to(),
            detail: e.to_string(),
        })?;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
    }
}
