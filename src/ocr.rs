//! OCR engine: the capability trait and the tesseract-backed implementation.
//!
//! The engine is initialised once per process (binary lookup, version probe,
//! language check) and then only read. Recognition itself is stateless: each
//! call owns a scoped temporary PNG that is removed on every exit path.

use crate::config::OcrSettings;
use crate::error::{RecoveredError, TextportError};
use image::{DynamicImage, RgbImage};
use std::process::Command;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Something that can turn an RGB raster into text.
pub trait OcrBackend: Send + Sync {
    /// Recognise text in `image`. An image without legible text yields an
    /// empty (or whitespace-only) string, not an error.
    fn recognize(&self, image: &RgbImage) -> Result<String, TextportError>;
}

/// A tesseract installation that passed its startup probe.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    settings: OcrSettings,
    version: String,
}

impl TesseractEngine {
    /// Probe the engine binary and the requested language packs.
    ///
    /// Fails with [`TextportError::OcrEngineUnavailable`] when the binary
    /// cannot be run or a language pack is missing.
    pub fn initialize(settings: &OcrSettings) -> Result<Self, TextportError> {
        let version_out = Command::new(&settings.command)
            .arg("--version")
            .output()
            .map_err(|e| TextportError::OcrEngineUnavailable {
                detail: format!("cannot run '{}': {}", settings.command, e),
            })?;

        // tesseract 3.x prints its version banner on stderr
        let banner = if version_out.stdout.is_empty() {
            String::from_utf8_lossy(&version_out.stderr).into_owned()
        } else {
            String::from_utf8_lossy(&version_out.stdout).into_owned()
        };
        let version = banner.lines().next().unwrap_or("").trim().to_string();
        if !version_out.status.success() && version.is_empty() {
            return Err(TextportError::OcrEngineUnavailable {
                detail: format!("'{} --version' exited with {}", settings.command, version_out.status),
            });
        }

        let langs_out = Command::new(&settings.command)
            .arg("--list-langs")
            .output()
            .map_err(|e| TextportError::OcrEngineUnavailable {
                detail: format!("cannot list languages: {e}"),
            })?;
        let mut listing = String::from_utf8_lossy(&langs_out.stdout).into_owned();
        listing.push_str(&String::from_utf8_lossy(&langs_out.stderr));
        let installed = parse_language_list(&listing);

        for lang in settings.language.split('+').map(str::trim).filter(|l| !l.is_empty()) {
            if !installed.iter().any(|l| l == lang) {
                return Err(TextportError::OcrEngineUnavailable {
                    detail: format!(
                        "language '{}' is not installed (available: {})",
                        lang,
                        installed.join(", ")
                    ),
                });
            }
        }

        info!("OCR engine ready: {} [{}]", version, settings.language);
        Ok(Self {
            settings: settings.clone(),
            version,
        })
    }

    /// The engine's version banner, e.g. `tesseract 5.3.0`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn settings(&self) -> &OcrSettings {
        &self.settings
    }

    fn run(&self, image_path: &std::path::Path) -> Result<String, TextportError> {
        let mut cmd = Command::new(&self.settings.command);
        cmd.arg(image_path)
            .arg("stdout")
            .args(["-l", &self.settings.language]);
        if let Some(psm) = self.settings.page_segmentation {
            cmd.args(["--psm", &psm.to_string()]);
        }

        let output = cmd.output().map_err(|e| TextportError::OcrEngineUnavailable {
            detail: format!("cannot run '{}': {}", self.settings.command, e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TextportError::OcrEngineUnavailable {
                detail: format!("engine exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrBackend for TesseractEngine {
    fn recognize(&self, image: &RgbImage) -> Result<String, TextportError> {
        let tmp = tempfile::Builder::new()
            .prefix("textport-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| TextportError::Internal(format!("tempfile: {e}")))?;

        let result = DynamicImage::ImageRgb8(image.clone())
            .save_with_format(tmp.path(), image::ImageFormat::Png)
            .map_err(|e| TextportError::Internal(format!("writing OCR input: {e}")))
            .and_then(|()| self.run(tmp.path()));

        let path = tmp.path().display().to_string();
        if let Err(e) = tmp.close() {
            warn!(
                "{}",
                RecoveredError::CleanupFailed {
                    resource: path,
                    detail: e.to_string(),
                }
            );
        }

        let text = result?;
        debug!("OCR produced {} bytes", text.len());
        Ok(text)
    }
}

/// Lines after the `List of available languages ...` header.
fn parse_language_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("List of available languages"))
        .map(str::to_string)
        .collect()
}

static DEFAULT_ENGINE: OnceLock<Result<Arc<TesseractEngine>, String>> = OnceLock::new();

/// The process-wide engine for default [`OcrSettings`], probed at most once.
///
/// A failed probe is cached too: installing tesseract later needs a restart.
pub fn default_engine() -> Result<Arc<TesseractEngine>, TextportError> {
    DEFAULT_ENGINE
        .get_or_init(|| {
            TesseractEngine::initialize(&OcrSettings::default())
                .map(Arc::new)
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(|detail| TextportError::OcrEngineUnavailable { detail })
}

/// Resolve the engine for a request: injected handle, then the shared
/// default engine, then a one-off engine for non-default settings.
pub(crate) fn resolve_backend(
    config: &crate::config::PipelineConfig,
) -> Result<Arc<dyn OcrBackend>, TextportError> {
    if let Some(ref backend) = config.ocr_backend {
        return Ok(Arc::clone(backend));
    }
    if config.ocr == OcrSettings::default() {
        return Ok(default_engine()? as Arc<dyn OcrBackend>);
    }
    Ok(Arc::new(TesseractEngine::initialize(&config.ocr)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn language_list_skips_header() {
        let listing = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nosd\ndeu\n";
        assert_eq!(parse_language_list(listing), vec!["eng", "osd", "deu"]);
    }

    #[test]
    fn default_engine_probe_is_cached() {
        match (default_engine(), default_engine()) {
            (Ok(a), Ok(b)) => assert!(Arc::ptr_eq(&a, &b)),
            (Err(a), Err(b)) => {
                assert_eq!(a.kind(), ErrorKind::OcrEngineError);
                assert_eq!(a.to_string(), b.to_string());
            }
            _ => panic!("default engine changed between calls"),
        }
    }

    #[test]
    fn missing_binary_is_engine_error() {
        let settings = OcrSettings {
            command: "textport-no-such-ocr-binary".into(),
            ..OcrSettings::default()
        };
        let err = TesseractEngine::initialize(&settings).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OcrEngineError);
    }

    #[test]
    fn injected_backend_wins() {
        struct Fixed;
        impl OcrBackend for Fixed {
            fn recognize(&self, _: &RgbImage) -> Result<String, TextportError> {
                Ok("fixed".into())
            }
        }
        let config = crate::config::PipelineConfig::builder()
            .ocr_command("textport-no-such-ocr-binary")
            .ocr_backend(Arc::new(Fixed))
            .build()
            .unwrap();
        let backend = resolve_backend(&config).unwrap();
        let img = RgbImage::new(1, 1);
        assert_eq!(backend.recognize(&img).unwrap(), "fixed");
    }
}
