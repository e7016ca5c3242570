//! Error types for the textport library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`TextportError`] is **fatal**: the request cannot be served at all
//!   (unsupported extension, corrupt document, OCR engine missing). Returned
//!   as `Err(TextportError)` from every pipeline entry point; no partial text
//!   or artifact accompanies it.
//!
//! * [`RecoveredError`] is **non-fatal**: something went wrong but the
//!   pipeline absorbed it (a PDF line replaced by the placeholder, a
//!   temporary file that could not be removed). These are logged with
//!   `tracing::warn!` and never reach the caller.
//!
//! [`ErrorKind`] collapses the fatal variants onto the coarse categories the
//! transport shells map to status codes.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the textport library.
#[derive(Debug, Error)]
pub enum TextportError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// A required request field was missing or empty.
    #[error("{message}")]
    MissingInput { message: String },

    /// Input file was not found at the given path.
    #[error("File not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    // ── Dispatch errors ───────────────────────────────────────────────────
    /// The file extension or requested target format is not supported.
    #[error("Unsupported format: '{format}'")]
    UnsupportedFormat { format: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The source document could not be parsed as its claimed format.
    #[error("Could not read {format} document: {detail}")]
    ExtractionFailed { format: &'static str, detail: String },

    /// The byte buffer is not valid UTF-8 text.
    #[error("Invalid UTF-8 text at byte {valid_up_to}: {detail}")]
    InvalidEncoding { valid_up_to: usize, detail: String },

    /// The OCR engine is missing or misconfigured.
    #[error("OCR engine unavailable: {detail}")]
    OcrEngineUnavailable { detail: String },

    /// The image buffer could not be decoded.
    #[error("Could not decode image: {detail}")]
    OcrFailed { detail: String },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// Document-level serialisation of the target format failed.
    #[error("Rendering {format} failed: {detail}")]
    RenderFailed { format: &'static str, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a blocking task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error categories, one per row of the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InputError,
    UnsupportedFormat,
    ExtractionFailure,
    EncodingError,
    OcrEngineError,
    OcrFailure,
    RenderFailure,
    Io,
    Internal,
}

impl TextportError {
    pub fn missing(message: impl Into<String>) -> Self {
        TextportError::MissingInput {
            message: message.into(),
        }
    }

    pub fn unsupported(format: impl Into<String>) -> Self {
        TextportError::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// The taxonomy category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TextportError::MissingInput { .. }
            | TextportError::FileNotFound { .. }
            | TextportError::PermissionDenied { .. } => ErrorKind::InputError,
            TextportError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            TextportError::ExtractionFailed { .. } => ErrorKind::ExtractionFailure,
            TextportError::InvalidEncoding { .. } => ErrorKind::EncodingError,
            TextportError::OcrEngineUnavailable { .. } => ErrorKind::OcrEngineError,
            TextportError::OcrFailed { .. } => ErrorKind::OcrFailure,
            TextportError::RenderFailed { .. } => ErrorKind::RenderFailure,
            TextportError::OutputWriteFailed { .. } => ErrorKind::Io,
            TextportError::InvalidConfig(_) | TextportError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// A fault the pipeline absorbed without failing the request.
///
/// Only ever logged; never returned to the caller.
#[derive(Debug, Clone, Error)]
pub enum RecoveredError {
    /// A PDF line could not be laid out and was replaced by the placeholder text.
    #[error("Line {line}: replaced with placeholder: {detail}")]
    LineOmitted { line: usize, detail: String },

    /// A scoped temporary resource could not be released.
    #[error("Cleanup of {resource} failed: {detail}")]
    CleanupFailed { resource: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_extension() {
        let e = TextportError::unsupported(".xyz");
        assert!(e.to_string().contains(".xyz"), "got: {e}");
        assert_eq!(e.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn missing_input_display_is_bare_message() {
        let e = TextportError::missing("No file uploaded");
        assert_eq!(e.to_string(), "No file uploaded");
        assert_eq!(e.kind(), ErrorKind::InputError);
    }

    #[test]
    fn file_errors_are_input_errors() {
        let e = TextportError::FileNotFound {
            path: PathBuf::from("/nope.txt"),
        };
        assert_eq!(e.kind(), ErrorKind::InputError);
        assert!(e.to_string().contains("/nope.txt"));
    }

    #[test]
    fn extraction_failed_display() {
        let e = TextportError::ExtractionFailed {
            format: "PDF",
            detail: "bad xref".into(),
        };
        assert!(e.to_string().contains("PDF"));
        assert!(e.to_string().contains("bad xref"));
        assert_eq!(e.kind(), ErrorKind::ExtractionFailure);
    }

    #[test]
    fn recovered_line_display() {
        let e = RecoveredError::LineOmitted {
            line: 4,
            detail: "no glyph".into(),
        };
        assert!(e.to_string().contains("Line 4"));
    }
}
