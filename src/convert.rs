//! The two pipeline entry points, plus file-system conveniences.
//!
//! Every call is synchronous and request-scoped: it reads only the shared,
//! immutable [`PipelineConfig`] and allocates nothing that outlives it.
//! The `_async` variants move the same work onto tokio's blocking pool,
//! since document parsing and OCR are CPU-bound and must not stall the
//! async worker threads.

use crate::config::PipelineConfig;
use crate::document::{ExtractedText, SourceDocument};
use crate::error::TextportError;
use crate::output::{TargetFormat, TransportPayload};
use crate::pipeline::{encode, extract, render};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Extract normalised text from an uploaded document.
///
/// The strategy is chosen from `filename`'s extension.
///
/// # Errors
/// - [`TextportError::UnsupportedFormat`] for an unknown extension
/// - [`TextportError::ExtractionFailed`], [`TextportError::InvalidEncoding`],
///   [`TextportError::OcrFailed`] when the bytes do not parse as claimed
/// - [`TextportError::OcrEngineUnavailable`] for an image when no engine can run
///
/// # Example
/// ```rust
/// use textport::{extract_text, PipelineConfig};
///
/// let text = extract_text(b"hello\nworld", "a.txt", &PipelineConfig::default()).unwrap();
/// assert_eq!(text.as_str(), "hello\nworld");
/// ```
pub fn extract_text(
    bytes: &[u8],
    filename: &str,
    config: &PipelineConfig,
) -> Result<ExtractedText, TextportError> {
    let start = Instant::now();
    let text = extract::extract(&SourceDocument::new(bytes, filename), config)?;
    info!(
        "Extracted {} chars from '{}' in {}ms",
        text.as_str().chars().count(),
        filename,
        start.elapsed().as_millis()
    );
    Ok(text)
}

/// Render `text` into the format named by `format_tag` and package it.
///
/// An unknown tag fails with [`TextportError::UnsupportedFormat`] before any
/// rendering happens.
///
/// # Example
/// ```rust
/// use textport::{convert_text, PipelineConfig};
///
/// let payload = convert_text("A\nB", "txt", "report", &PipelineConfig::default()).unwrap();
/// assert_eq!(payload.filename, "report.txt");
/// assert_eq!(payload.mime_type, "text/plain");
/// ```
pub fn convert_text(
    text: &str,
    format_tag: &str,
    filename: &str,
    config: &PipelineConfig,
) -> Result<TransportPayload, TextportError> {
    let format: TargetFormat = format_tag.parse()?;
    let start = Instant::now();
    let artifact = render::render(text, format, config)?;
    let payload = encode::encode_artifact(&artifact, filename);
    info!(
        "Converted {} chars to {} ({} bytes) in {}ms",
        text.chars().count(),
        payload.filename,
        artifact.bytes.len(),
        start.elapsed().as_millis()
    );
    Ok(payload)
}

/// [`extract_text`] on tokio's blocking pool.
pub async fn extract_text_async(
    bytes: Vec<u8>,
    filename: String,
    config: &PipelineConfig,
) -> Result<ExtractedText, TextportError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || extract_text(&bytes, &filename, &config))
        .await
        .map_err(|e| TextportError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// [`convert_text`] on tokio's blocking pool.
pub async fn convert_text_async(
    text: String,
    format_tag: String,
    filename: String,
    config: &PipelineConfig,
) -> Result<TransportPayload, TextportError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || convert_text(&text, &format_tag, &filename, &config))
        .await
        .map_err(|e| TextportError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Read a local file and extract its text. The file name selects the strategy.
pub fn extract_file(
    path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<ExtractedText, TextportError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => TextportError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => TextportError::FileNotFound {
            path: path.to_path_buf(),
        },
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    extract_text(&bytes, &filename, config)
}

/// Decode `payload` and write it into `dir` under its own filename.
///
/// Uses atomic write (temp file + rename) so a reader never sees a partial
/// file. Returns the final path.
pub fn write_payload(payload: &TransportPayload, dir: impl AsRef<Path>) -> Result<PathBuf, TextportError> {
    let dir = dir.as_ref();
    let name = Path::new(&payload.filename)
        .file_name()
        .ok_or_else(|| TextportError::missing("Payload has no filename"))?;
    let path = dir.join(name);

    let bytes = encode::decode_payload(payload)
        .map_err(|e| TextportError::Internal(format!("Payload is not valid base64: {e}")))?;

    let write_err = |e: std::io::Error| TextportError::OutputWriteFailed {
        path: path.clone(),
        source: e,
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;
    // Unique name in the target dir; removed on drop if persisting fails.
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&bytes).map_err(write_err)?;
    tmp.persist(&path).map_err(|e| write_err(e.error))?;

    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn unknown_tag_fails_before_rendering() {
        let err = convert_text("x", "rtf", "x", &PipelineConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn extract_file_missing_is_input_error() {
        let err = extract_file("/definitely/not/here.txt", &PipelineConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputError);
    }

    #[test]
    fn extract_file_reads_and_dispatches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.TXT");
        std::fs::write(&path, "  line one\r\nline two  ").unwrap();
        let text = extract_file(&path, &PipelineConfig::default()).unwrap();
        assert_eq!(text.as_str(), "line one\nline two");
    }

    #[test]
    fn write_payload_creates_file_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested");
        let payload = convert_text("A\nB", "txt", "report", &PipelineConfig::default()).unwrap();
        let path = write_payload(&payload, &out_dir).unwrap();
        assert_eq!(path, out_dir.join("report.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"A\nB");
        assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 1);
    }

    #[test]
    fn write_payload_failure_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("report.txt");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let payload = convert_text("A", "txt", "report", &PipelineConfig::default()).unwrap();
        let err = write_payload(&payload, dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("report.txt")]);
    }

    #[tokio::test]
    async fn async_variants_match_sync() {
        let config = PipelineConfig::default();
        let text = extract_text_async(b"hi\n".to_vec(), "a.txt".into(), &config)
            .await
            .unwrap();
        assert_eq!(text.as_str(), "hi");

        let payload = convert_text_async("hi".into(), "pdf".into(), "x".into(), &config)
            .await
            .unwrap();
        assert_eq!(payload.mime_type, "application/pdf");
    }
}
