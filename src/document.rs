//! Request-scoped value types on the extraction side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An uploaded file: raw bytes plus the name it was uploaded under.
///
/// The name is only used to pick an extraction strategy.
#[derive(Debug, Clone, Copy)]
pub struct SourceDocument<'a> {
    pub bytes: &'a [u8],
    pub filename: &'a str,
}

impl<'a> SourceDocument<'a> {
    pub fn new(bytes: &'a [u8], filename: &'a str) -> Self {
        Self { bytes, filename }
    }
}

/// Normalised text produced by an extraction strategy.
///
/// Line breaks are `\n` (CRLF and lone CR are folded) and surrounding
/// whitespace is trimmed. May be empty, e.g. for an image without text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(raw: &str) -> Self {
        let normalised = if raw.contains('\r') {
            raw.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            raw.to_string()
        };
        Self(normalised.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_keeps_inner_breaks() {
        let t = ExtractedText::new("  \n hello\nworld \n\n");
        assert_eq!(t.as_str(), "hello\nworld");
    }

    #[test]
    fn folds_carriage_returns() {
        assert_eq!(ExtractedText::new("a\r\nb\rc").as_str(), "a\nb\nc");
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(ExtractedText::new(" \t\n ").is_empty());
    }

    #[test]
    fn serialises_as_plain_string() {
        let json = serde_json::to_string(&ExtractedText::new("x")).unwrap();
        assert_eq!(json, "\"x\"");
    }
}
