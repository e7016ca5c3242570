//! Boundary layer between a transport shell and the pipeline.
//!
//! Validates requests once, before dispatch, and turns pipeline errors into
//! the single descriptive message the shell returns. Shell-agnostic: the
//! HTTP server and the CLI both go through here.

use crate::config::PipelineConfig;
use crate::convert;
use crate::error::{ErrorKind, TextportError};
use crate::output::TransportPayload;
use crate::pipeline::sanitize::FALLBACK_NAME;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// An uploaded file as received by a shell.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Success body of an extraction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractTextBody {
    #[serde(rename = "extractedText")]
    pub extracted_text: String,
}

/// Body of a conversion request. Every field is optional on the wire;
/// [`handle_convert`] decides what is required.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ConvertRequest {
    pub text: Option<String>,
    pub format: Option<String>,
    pub filename: Option<String>,
}

/// Failure body: serialises as `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceError {
    #[serde(skip)]
    pub kind: ErrorKind,
    #[serde(rename = "error")]
    pub message: String,
}

impl ServiceError {
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InputError,
            message: message.into(),
        }
    }

    pub fn extraction(err: &TextportError) -> Self {
        Self::prefixed("Extraction failed", err)
    }

    pub fn conversion(err: &TextportError) -> Self {
        Self::prefixed("Conversion failed", err)
    }

    fn prefixed(prefix: &str, err: &TextportError) -> Self {
        warn!("{}: {}", prefix, err);
        Self {
            kind: err.kind(),
            message: format!("{prefix}: {err}"),
        }
    }

    /// HTTP status for this error: 400 for rejected input, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        match self.kind {
            ErrorKind::InputError => 400,
            _ => 500,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Validate and run an extraction request.
pub fn handle_extract(
    upload: Option<&Upload>,
    config: &PipelineConfig,
) -> Result<ExtractTextBody, ServiceError> {
    let upload = match upload {
        Some(u) if !u.filename.is_empty() => u,
        _ => return Err(ServiceError::input("No file uploaded")),
    };
    let text = convert::extract_text(&upload.bytes, &upload.filename, config)
        .map_err(|e| ServiceError::extraction(&e))?;
    Ok(ExtractTextBody {
        extracted_text: text.into_string(),
    })
}

/// Validate and run a conversion request.
pub fn handle_convert(
    request: &ConvertRequest,
    config: &PipelineConfig,
) -> Result<TransportPayload, ServiceError> {
    let text = match request.text.as_deref() {
        Some(t) if !t.is_empty() => t,
        _ => return Err(ServiceError::input("No text provided")),
    };
    let format = match request.format.as_deref().map(str::trim) {
        Some(f) if !f.is_empty() => f,
        _ => return Err(ServiceError::input("No format specified")),
    };
    let filename = request.filename.as_deref().unwrap_or(FALLBACK_NAME);

    convert::convert_text(text, format, filename, config).map_err(|e| ServiceError::conversion(&e))
}
