//! # textport
//!
//! Pull plain text out of uploaded documents, and render plain text back
//! into downloadable documents.
//!
//! ## Pipeline Overview
//!
//! ```text
//! extraction                               rendering
//!
//! bytes + filename                         text + format tag
//!  │                                        │
//!  ├─ dispatch on extension                 ├─ dispatch on tag (txt | pdf | doc)
//!  │   .txt   strict UTF-8                  │   txt  UTF-8 bytes
//!  │   .pdf   text layer, page order        │   pdf  paginated, base-14 font
//!  │   .docx  body paragraphs               │   doc  one paragraph per line
//!  │   image  decode → RGB → OCR            │
//!  └─ normalise (\n, trim)                  └─ encode (sanitized name, MIME, base64)
//!      │                                        │
//!      ▼                                        ▼
//!  ExtractedText                            TransportPayload
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use textport::{convert_text, extract_text, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//!
//! let text = extract_text(b"  hello\r\nworld\n", "notes.txt", &config).unwrap();
//! assert_eq!(text.as_str(), "hello\nworld");
//!
//! let payload = convert_text(text.as_str(), "pdf", "My:Notes*.txt", &config).unwrap();
//! assert_eq!(payload.filename, "MyNotes.pdf");
//! assert_eq!(payload.mime_type, "application/pdf");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `textport` binary (clap + anyhow + tracing-subscriber) |
//! | `server` | on      | Enables [`server`], the HTTP shell (axum + tower-http) |
//!
//! Disable both when using only the library:
//! ```toml
//! textport = { version = "0.1", default-features = false }
//! ```
//!
//! ## OCR
//!
//! Image extraction drives a [`TesseractEngine`]. Initialise it once at
//! startup and pass it in through [`PipelineConfig::ocr_backend`]; otherwise
//! the first image request probes the default engine for the whole process.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod ocr;
pub mod output;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;
pub mod service;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BuiltinFont, OcrSettings, PdfLayout, PipelineConfig, PipelineConfigBuilder};
pub use convert::{
    convert_text, convert_text_async, extract_file, extract_text, extract_text_async,
    write_payload,
};
pub use document::{ExtractedText, SourceDocument};
pub use error::{ErrorKind, RecoveredError, TextportError};
pub use ocr::{default_engine, OcrBackend, TesseractEngine};
pub use output::{RenderedArtifact, TargetFormat, TransportPayload};
pub use pipeline::encode::encode_artifact;
pub use pipeline::extract::extract;
pub use pipeline::render::render;
pub use pipeline::sanitize::sanitize_filename;
