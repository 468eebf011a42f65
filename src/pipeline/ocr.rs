//! Text recognition with the pure-Rust `ocrs` engine.
//!
//! The engine runs two neural network models through `rten`: a detection
//! model that locates text regions and a recognition model that decodes
//! characters from them. Both are loaded once at construction and reused
//! for every page of the run.
//!
//! # Model Setup
//!
//! The model files (`text-detection.rten`, `text-recognition.rten`) can be
//! downloaded from the ocrs-models releases, or obtained automatically by
//! running the `ocrs-cli` tool once; the default cache directory is
//! `$XDG_CACHE_HOME/ocrs` (typically `~/.cache/ocrs`).
//!
//! Note: `ocrs` and `rten` must be compiled in release mode; debug builds
//! recognize 10-100x slower.

use std::path::{Path, PathBuf};

use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info};

use crate::error::ExtractError;
use crate::page::{RasterPage, RecognizeError, TextRecognizer};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Default directory for cached model files.
///
/// Follows the XDG Base Directory specification: `$XDG_CACHE_HOME/ocrs`,
/// falling back to `~/.cache/ocrs` when `XDG_CACHE_HOME` is unset.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

fn load_model(path: &Path, role: &str) -> Result<Model, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::EngineInitFailed {
            detail: format!(
                "{} model not found at {}; run `ocrs-cli` once to download models, \
                 or fetch them from the ocrs-models releases",
                role,
                path.display()
            ),
        });
    }
    Model::load_file(path).map_err(|e| ExtractError::EngineInitFailed {
        detail: format!("failed to load {} model from {}: {}", role, path.display(), e),
    })
}

/// OCR engine wrapper implementing [`TextRecognizer`].
///
/// Model loading is the expensive step; the engine is constructed once per
/// run and reused for every page.
pub struct OcrsRecognizer {
    engine: OcrEngine,
}

impl std::fmt::Debug for OcrsRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrsRecognizer").finish_non_exhaustive()
    }
}

impl OcrsRecognizer {
    /// Load the models and initialise the engine.
    ///
    /// The bundled recognition model reads Latin script only, so `language`
    /// must be `"eng"`; any other tag fails initialisation rather than
    /// silently recognizing the wrong alphabet. `model_dir` overrides the
    /// default cache location.
    pub fn new(language: &str, model_dir: Option<&Path>) -> Result<Self, ExtractError> {
        if !language.trim().eq_ignore_ascii_case("eng") {
            return Err(ExtractError::EngineInitFailed {
                detail: format!(
                    "unsupported language tag {:?}: the recognition model covers \
                     Latin script only (use \"eng\")",
                    language
                ),
            });
        }

        let dir = model_dir.map(Path::to_path_buf).unwrap_or_else(default_model_dir);
        info!(model_dir = %dir.display(), "loading OCR models");

        let detection = load_model(&dir.join(DETECTION_MODEL_FILENAME), "detection")?;
        let recognition = load_model(&dir.join(RECOGNITION_MODEL_FILENAME), "recognition")?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection),
            recognition_model: Some(recognition),
            ..Default::default()
        })
        .map_err(|e| ExtractError::EngineInitFailed {
            detail: format!("failed to initialise OCR engine: {}", e),
        })?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }
}

impl TextRecognizer for OcrsRecognizer {
    fn recognize(&mut self, page: &RasterPage) -> Result<String, RecognizeError> {
        if page.bytes_per_pixel != 3 {
            return Err(RecognizeError::new(format!(
                "expected packed RGB input (3 bytes per pixel), got {}",
                page.bytes_per_pixel
            )));
        }

        let packed = page.packed_rows();
        let source = ImageSource::from_bytes(&packed, (page.width, page.height))
            .map_err(|e| RecognizeError::new(format!("bad image source: {}", e)))?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|e| RecognizeError::new(format!("preprocessing failed: {}", e)))?;

        let text = self
            .engine
            .get_text(&input)
            .map_err(|e| RecognizeError::new(format!("recognition failed: {}", e)))?;

        debug!(
            lines = text.lines().count(),
            chars = text.len(),
            "recognition complete"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_english_language_is_rejected() {
        let err = OcrsRecognizer::new("deu", None).unwrap_err();
        assert!(matches!(err, ExtractError::EngineInitFailed { .. }));
    }

    #[test]
    fn missing_models_fail_initialisation() {
        let err =
            OcrsRecognizer::new("eng", Some(Path::new("/nonexistent/ocr-models"))).unwrap_err();
        match err {
            ExtractError::EngineInitFailed { detail } => {
                assert!(detail.contains("not found"), "got: {detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
