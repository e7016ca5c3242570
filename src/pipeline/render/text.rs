use super::Renderer;
use crate::config::PipelineConfig;
use crate::error::TextportError;

/// `txt`: the text as UTF-8 bytes, unchanged.
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(&self, text: &str, _config: &PipelineConfig) -> Result<Vec<u8>, TextportError> {
        Ok(text.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_verbatim() {
        let text = "  héllo\r\nwörld\n\n";
        let bytes = TextRenderer.render(text, &PipelineConfig::default()).unwrap();
        assert_eq!(bytes, text.as_bytes());
    }
}
