//! Target formats and the values produced on the rendering side.

use crate::error::TextportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Formats text can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Txt,
    Pdf,
    /// Word document. Tagged `doc` on the wire, written as OOXML (`.docx` content).
    Doc,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 3] = [TargetFormat::Txt, TargetFormat::Pdf, TargetFormat::Doc];

    /// The wire tag, also used as the file extension.
    pub fn tag(self) -> &'static str {
        match self {
            TargetFormat::Txt => "txt",
            TargetFormat::Pdf => "pdf",
            TargetFormat::Doc => "doc",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            TargetFormat::Txt => "text/plain",
            TargetFormat::Pdf => "application/pdf",
            TargetFormat::Doc => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl FromStr for TargetFormat {
    type Err = TextportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(TargetFormat::Txt),
            "pdf" => Ok(TargetFormat::Pdf),
            "doc" => Ok(TargetFormat::Doc),
            _ => Err(TextportError::unsupported(s.trim())),
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The raw output of a rendering strategy.
///
/// Carries no download name: the caller's requested filename goes straight
/// to [`encode_artifact`](crate::pipeline::encode::encode_artifact), which
/// sanitizes it and appends the format tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub bytes: Vec<u8>,
    pub format: TargetFormat,
}

impl RenderedArtifact {
    pub fn new(bytes: Vec<u8>, format: TargetFormat) -> Self {
        Self { bytes, format }
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// A rendered artifact packaged for the transport shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportPayload {
    /// Base64 (standard alphabet, padded) of the artifact bytes.
    pub file_data: String,
    pub filename: String,
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn mime_table() {
        assert_eq!(TargetFormat::Txt.mime_type(), "text/plain");
        assert_eq!(TargetFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(
            TargetFormat::Doc.mime_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("PDF".parse::<TargetFormat>().unwrap(), TargetFormat::Pdf);
        assert_eq!(" doc ".parse::<TargetFormat>().unwrap(), TargetFormat::Doc);
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        let err = "rtf".parse::<TargetFormat>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.to_string().contains("rtf"));
    }

    #[test]
    fn payload_uses_camel_case_keys() {
        let p = TransportPayload {
            file_data: "QQ==".into(),
            filename: "a.txt".into(),
            mime_type: "text/plain".into(),
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["fileData"], "QQ==");
        assert_eq!(v["mimeType"], "text/plain");
        assert_eq!(v["filename"], "a.txt");
    }
}
