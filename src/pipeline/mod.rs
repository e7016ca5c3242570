//! Pipeline stages for both conversion directions.
//!
//! Each submodule implements exactly one step. Strategies for a direction
//! share one capability trait and are selected from a fixed table, so adding
//! a format means adding one table entry and one strategy.
//!
//! ## Data Flow
//!
//! ```text
//! extraction:  bytes + filename ──▶ extract ──▶ ExtractedText
//!                                  (dispatch on extension)
//!
//! rendering:   text + format ──▶ render ──▶ encode ──▶ TransportPayload
//!                               (dispatch)  (sanitize name, base64)
//! ```
//!
//! 1. [`extract`]: pick a strategy from the lower-cased file extension
//!    (`.txt`, `.pdf`, `.docx`, images) and normalise its output
//! 2. [`render`]: pick a strategy from the target format tag and
//!    serialise the text to bytes
//! 3. [`sanitize`]: reduce a caller-supplied name to a safe download name
//! 4. [`encode`]: base64-wrap the artifact with its MIME type and name
//!
//! Every stage is synchronous and request-scoped; see
//! [`crate::convert`] for the async wrappers.

pub mod encode;
pub mod extract;
pub mod render;
pub mod sanitize;
