use super::Extractor;
use crate::config::PipelineConfig;
use crate::error::TextportError;
use docx_rs::{DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild};
use tracing::debug;

/// `.docx`: body paragraphs in document order, one per line.
///
/// Empty paragraphs become empty lines. Tables and other non-paragraph body
/// children are skipped.
pub struct DocxExtractor;

impl Extractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "DOCX"
    }

    fn extract(&self, bytes: &[u8], _config: &PipelineConfig) -> Result<String, TextportError> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| TextportError::ExtractionFailed {
            format: self.name(),
            detail: e.to_string(),
        })?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
                _ => None,
            })
            .collect();

        debug!("DOCX parsed: {} paragraphs", paragraphs.len());
        Ok(paragraphs.join("\n"))
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut out = String::new();
    push_children(&paragraph.children, &mut out);
    out
}

/// Runs, hyperlink text and tracked insertions all count as paragraph text.
fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            ParagraphChild::Insert(insert) => {
                for ic in &insert.children {
                    if let InsertChild::Run(run) = ic {
                        push_run(run, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for rc in &run.children {
        match rc {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
