//! `pdf`: paginated plain-text layout with a standard Type 1 font.
//!
//! ## Layout
//!
//! Every `\n`-separated line becomes one block, wrapped to the printable
//! width at word boundaries and advanced by a fixed line height. A new page
//! starts as soon as the next line would cross the bottom margin. Vertical
//! positions are tracked in millimetres from the top edge and converted to
//! PDF user space (points, origin bottom-left) only when emitted.
//!
//! ## Character policy
//!
//! The font is one of the PDF base-14 faces, so nothing is embedded and no
//! font file can be missing. Those faces only cover the printable ASCII
//! range here; every other character is replaced by
//! [`PdfLayout::placeholder_char`] before layout. A line that still cannot
//! be measured is replaced by [`PdfLayout::omitted_line_text`] and logged as
//! [`RecoveredError::LineOmitted`]; the rest of the document is unaffected.

use super::{split_lines, Renderer};
use crate::config::{is_printable_ascii, BuiltinFont, PdfLayout, PipelineConfig};
use crate::error::{RecoveredError, TextportError};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

const MM_PER_PT: f64 = 25.4 / 72.0;

pub struct PdfRenderer;

impl Renderer for PdfRenderer {
    fn name(&self) -> &'static str {
        "PDF"
    }

    fn render(&self, text: &str, config: &PipelineConfig) -> Result<Vec<u8>, TextportError> {
        let layout = &config.pdf;
        let pages = paginate(text, layout);
        debug!("PDF layout: {} pages", pages.len());
        write_document(pages, layout).map_err(|e| TextportError::RenderFailed {
            format: self.name(),
            detail: e.to_string(),
        })
    }
}

/// A character with no glyph in the selected font.
#[derive(Debug)]
struct Unmeasurable(char);

/// Lay out `text` into per-page content operations.
fn paginate(text: &str, layout: &PdfLayout) -> Vec<Vec<Operation>> {
    let font_size_mm = layout.font_size_pt * MM_PER_PT;
    let max_width_mm = layout.page_width_mm - 2.0 * layout.margin_mm;
    let page_floor_mm = layout.page_height_mm - layout.bottom_margin_mm;

    let mut pages: Vec<Vec<Operation>> = vec![Vec::new()];
    let mut y_mm = layout.margin_mm;

    for (idx, raw) in split_lines(text).enumerate() {
        let line = substitute(raw, layout.placeholder_char);
        let rows = match wrap(&line, layout.font, font_size_mm, max_width_mm) {
            Ok(rows) => rows,
            Err(Unmeasurable(c)) => {
                warn!(
                    "{}",
                    RecoveredError::LineOmitted {
                        line: idx + 1,
                        detail: format!("no glyph for {c:?} in {}", layout.font.base_font()),
                    }
                );
                wrap(&layout.omitted_line_text, layout.font, font_size_mm, max_width_mm)
                    .unwrap_or_default()
            }
        };

        for row in rows {
            if y_mm + layout.line_height_mm > page_floor_mm {
                pages.push(Vec::new());
                y_mm = layout.margin_mm;
            }
            if !row.is_empty() {
                let baseline_mm = y_mm + layout.line_height_mm / 2.0 + 0.3 * font_size_mm;
                if let Some(page) = pages.last_mut() {
                    page.extend(show_text(
                        &row,
                        to_pt(layout.margin_mm),
                        to_pt(layout.page_height_mm - baseline_mm),
                        layout.font_size_pt,
                    ));
                }
            }
            y_mm += layout.line_height_mm;
        }
    }

    pages
}

fn substitute(line: &str, placeholder: char) -> String {
    line.chars()
        .map(|c| if is_printable_ascii(c) { c } else { placeholder })
        .collect()
}

/// Greedy word wrap. Breaks at the last space that fits, or mid-word when a
/// single word is wider than the line. Spaces at a break are dropped.
fn wrap(
    line: &str,
    font: BuiltinFont,
    font_size_mm: f64,
    max_width_mm: f64,
) -> Result<Vec<String>, Unmeasurable> {
    let advance = |c: char| -> Result<f64, Unmeasurable> {
        glyph_width(font, c)
            .map(|w| f64::from(w) * font_size_mm / 1000.0)
            .ok_or(Unmeasurable(c))
    };

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut width = 0.0;
    let mut last_space: Option<usize> = None;

    for c in line.chars() {
        let w = advance(c)?;
        if width + w > max_width_mm && !current.is_empty() {
            if c == ' ' {
                rows.push(std::mem::take(&mut current));
                width = 0.0;
                last_space = None;
                continue;
            }
            match last_space {
                Some(at) if at > 0 => {
                    let rest = current.split_off(at + 1);
                    current.truncate(at);
                    rows.push(std::mem::replace(&mut current, rest));
                    width = current.chars().map(&advance).sum::<Result<f64, _>>()?;
                    // carried-over word may still not leave room for `c`
                    if width + w > max_width_mm {
                        rows.push(std::mem::take(&mut current));
                        width = 0.0;
                    }
                }
                _ => {
                    rows.push(std::mem::take(&mut current));
                    width = 0.0;
                }
            }
            last_space = None;
        }
        if c == ' ' {
            if current.is_empty() && !rows.is_empty() {
                continue;
            }
            last_space = Some(current.len());
        }
        current.push(c);
        width += w;
    }
    rows.push(current);
    Ok(rows)
}

/// Advance width in 1/1000 em, `None` outside printable ASCII.
fn glyph_width(font: BuiltinFont, c: char) -> Option<u16> {
    if !is_printable_ascii(c) {
        return None;
    }
    match font {
        BuiltinFont::Courier => Some(600),
        BuiltinFont::Helvetica => HELVETICA_WIDTHS.get(c as usize - 0x20).copied(),
    }
}

/// Helvetica advance widths for U+0020..=U+007E.
#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

fn to_pt(mm: f64) -> i64 {
    (mm / MM_PER_PT).round() as i64
}

fn show_text(row: &str, x: i64, y: i64, font_size_pt: f64) -> [Operation; 5] {
    // whole points only; sizes are rounded, never below 1
    let size = (font_size_pt.round() as i64).max(1);
    [
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(row)]),
        Operation::new("ET", vec![]),
    ]
}

fn write_document(pages: Vec<Vec<Operation>>, layout: &PdfLayout) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => layout.font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }.encode()?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                to_pt(layout.page_width_mm).into(),
                to_pt(layout.page_height_mm).into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal("textport"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::{Extractor, PdfExtractor};

    fn read_back(bytes: &[u8]) -> String {
        PdfExtractor
            .extract(bytes, &PipelineConfig::default())
            .unwrap()
    }

    #[test]
    fn output_is_a_pdf() {
        let bytes = PdfRenderer
            .render("hello", &PipelineConfig::default())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn non_ascii_is_substituted_not_fatal() {
        let bytes = PdfRenderer
            .render("héllo→wörld", &PipelineConfig::default())
            .unwrap();
        assert!(!bytes.is_empty());
        assert!(read_back(&bytes).contains("h?llo?w?rld"));
    }

    #[test]
    fn unmeasurable_line_is_replaced() {
        let mut config = PipelineConfig::default();
        // bypasses builder validation to force a layout fault
        config.pdf.placeholder_char = 'é';
        let bytes = PdfRenderer.render("naïve\nplain", &config).unwrap();
        let text = read_back(&bytes);
        assert!(text.contains("[Content omitted due to encoding issues]"), "got: {text:?}");
        assert!(text.contains("plain"), "got: {text:?}");
        assert!(text.starts_with("[Content omitted"), "got: {text:?}");
    }

    #[test]
    fn breaks_pages_at_bottom_margin() {
        // 27 rows fit between the 10 mm top margin and the 15 mm bottom margin
        let text = vec!["row"; 60].join("\n");
        let bytes = PdfRenderer.render(&text, &PipelineConfig::default()).unwrap();
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 3);

        let exact = vec!["row"; 27].join("\n");
        let bytes = PdfRenderer.render(&exact, &PipelineConfig::default()).unwrap();
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn empty_text_is_one_blank_page() {
        let bytes = PdfRenderer.render("", &PipelineConfig::default()).unwrap();
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
        assert_eq!(read_back(&bytes), "");
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let rows = wrap("hello world", BuiltinFont::Courier, 1.0, 3.1).unwrap();
        assert_eq!(rows, vec!["hello", "world"]);
        let rows = wrap("aa bb cc", BuiltinFont::Courier, 1.0, 3.1).unwrap();
        assert_eq!(rows, vec!["aa bb", "cc"]);
    }

    #[test]
    fn carried_word_never_overflows_row() {
        // "i aaaa" fits 3.0 mm; "aaaa" + "W" does not
        let rows = wrap("i aaaaW", BuiltinFont::Helvetica, 1.0, 3.0).unwrap();
        assert_eq!(rows, vec!["i", "aaaa", "W"]);
        for row in &rows {
            let w: f64 = row
                .chars()
                .map(|c| f64::from(glyph_width(BuiltinFont::Helvetica, c).unwrap()) / 1000.0)
                .sum();
            assert!(w <= 3.0, "{row:?} is {w} mm");
        }
    }

    #[test]
    fn long_word_is_split() {
        let rows = wrap(&"a".repeat(200), BuiltinFont::Helvetica, 12.0 * MM_PER_PT, 190.0).unwrap();
        let lens: Vec<_> = rows.iter().map(String::len).collect();
        assert_eq!(lens, vec![80, 80, 40]);
    }

    #[test]
    fn empty_line_is_one_blank_row() {
        assert_eq!(wrap("", BuiltinFont::Helvetica, 4.0, 190.0).unwrap(), vec![""]);
    }

    #[test]
    fn width_table_covers_printable_ascii() {
        for c in ' '..='~' {
            assert!(glyph_width(BuiltinFont::Helvetica, c).is_some(), "{c:?}");
        }
        assert_eq!(glyph_width(BuiltinFont::Helvetica, 'é'), None);
        assert_eq!(glyph_width(BuiltinFont::Courier, '\t'), None);
    }
}
