//! Transport encoding: `RenderedArtifact` → base64 `TransportPayload`.
//!
//! JSON bodies cannot carry raw bytes, so the artifact travels as standard
//! base64 (padded) next to its MIME type and a sanitized download name.

use super::sanitize::sanitize_filename;
use crate::output::{RenderedArtifact, TransportPayload};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Package `artifact` for the shell.
///
/// The filename is `sanitize(requested_filename) + "." + tag`, where the tag
/// and MIME type come from the artifact's format. Never fails.
pub fn encode_artifact(artifact: &RenderedArtifact, requested_filename: &str) -> TransportPayload {
    let filename = format!(
        "{}.{}",
        sanitize_filename(requested_filename),
        artifact.format.tag()
    );
    let file_data = STANDARD.encode(&artifact.bytes);
    debug!(
        "Encoded {} ({} bytes → {} bytes base64)",
        filename,
        artifact.bytes.len(),
        file_data.len()
    );

    TransportPayload {
        file_data,
        filename,
        mime_type: artifact.mime_type().to_string(),
    }
}

/// Decode a payload's `fileData` back into bytes.
pub fn decode_payload(payload: &TransportPayload) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(&payload.file_data)
}
