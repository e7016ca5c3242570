//! Filename sanitizer: caller-supplied name → safe download stem.

use once_cell::sync::Lazy;
use regex::Regex;

/// Extensions of every format the pipeline reads or writes.
static KNOWN_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(txt|pdf|docx?|png|jpe?g|bmp|tiff?)$").unwrap());

/// Returned when nothing of the input survives.
pub const FALLBACK_NAME: &str = "output";

/// Reduce `name` to a stem made of `[A-Za-z0-9 _-]`.
///
/// Drops any directory prefix (`/` or `\`) and a trailing known extension,
/// filters the rest, trims it, and falls back to [`FALLBACK_NAME`] when the
/// result is empty. Total: never fails, for any input.
///
/// ```rust
/// use textport::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My:File*.txt"), "MyFile");
/// assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_filename("***"), "output");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = KNOWN_EXTENSION.replace(base, "");
    let kept: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let trimmed = kept.trim();
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
