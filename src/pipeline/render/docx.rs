use super::{split_lines, Renderer};
use crate::config::PipelineConfig;
use crate::error::TextportError;
use docx_rs::{Docx, Paragraph, Run};
use std::io::Cursor;

/// `doc`: one paragraph per line, empty lines included, in order.
///
/// Written as an OOXML word-processing package.
pub struct DocxRenderer;

impl Renderer for DocxRenderer {
    fn name(&self) -> &'static str {
        "DOCX"
    }

    fn render(&self, text: &str, _config: &PipelineConfig) -> Result<Vec<u8>, TextportError> {
        let docx = split_lines(text).fold(Docx::new(), |docx, line| {
            let paragraph = if line.is_empty() {
                Paragraph::new()
            } else {
                Paragraph::new().add_run(Run::new().add_text(line))
            };
            docx.add_paragraph(paragraph)
        });

        let mut cursor = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut cursor)
            .map_err(|e| TextportError::RenderFailed {
                format: self.name(),
                detail: e.to_string(),
            })?;
        Ok(cursor.into_inner())
    }
}
