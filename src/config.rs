//! Configuration types for an ISBN extraction run.
//!
//! All run behaviour is controlled through [`ScanConfig`], built via its
//! [`ScanConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to serialise a run's parameters for logging and to diff two runs to
//! understand why their outputs differ.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::matcher::DEFAULT_MAX_CANDIDATES;

/// The closed set of supported document formats.
///
/// The pipeline resolves a format tag to exactly one page provider up
/// front and carries no further format-specific logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// Portable Document Format, rasterized through pdfium.
    Pdf,
    /// DjVu, rasterized through the djvulibre reference decoder.
    Djvu,
}

impl DocumentFormat {
    /// Parse a user-supplied type tag, case-insensitive.
    ///
    /// Accepts `pdf`, `djv`, and `djvu`; anything else is the fatal
    /// [`ExtractError::UnsupportedFormat`].
    pub fn from_tag(tag: &str) -> Result<Self, ExtractError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "djv" | "djvu" => Ok(Self::Djvu),
            _ => Err(ExtractError::UnsupportedFormat {
                tag: tag.to_string(),
            }),
        }
    }

    /// Infer a format from a file extension, when no tag was given.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_tag(ext).ok()
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => f.write_str("pdf"),
            Self::Djvu => f.write_str("djvu"),
        }
    }
}

/// Configuration for one extraction run over one document.
///
/// Built via [`ScanConfig::builder()`].
///
/// # Example
/// ```rust
/// use isbn_extract::{DocumentFormat, ScanConfig};
///
/// let config = ScanConfig::builder()
///     .format(DocumentFormat::Pdf)
///     .pages(3)
///     .language("eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Document format. `None` means infer from the file extension at run
    /// time; an explicit tag always wins.
    pub format: Option<DocumentFormat>,

    /// Number of pages to process, from the start of the document.
    /// Required, positive, and strictly below the document's page total.
    pub pages: usize,

    /// OCR language tag in ISO 639-3. Default: `"eng"`.
    ///
    /// Passed to the recognizer at initialisation; a tag the engine cannot
    /// honour is a fatal init failure, not a silent fallback.
    pub language: String,

    /// Upper bound on ISBN candidates collected per page. Default: 64.
    ///
    /// An explicit, documented cap — garbage OCR output on a noisy scan can
    /// match the pattern hundreds of times, and unbounded collection would
    /// let one page dominate memory and output.
    pub max_candidates_per_page: usize,

    /// Maximum rendered page dimension (width or height) in pixels.
    /// Default: 2000.
    ///
    /// A safety cap independent of the page's physical size: an A0 poster
    /// page rendered at natural resolution could exhaust memory. Either
    /// dimension is capped, the other scales proportionally.
    pub max_render_pixels: u32,

    /// Directory containing the OCR model files. `None` uses the engine's
    /// default cache location.
    pub ocr_model_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            format: None,
            pages: 1,
            language: "eng".to_string(),
            max_candidates_per_page: DEFAULT_MAX_CANDIDATES,
            max_render_pixels: 2000,
            ocr_model_dir: None,
        }
    }
}

impl ScanConfig {
    /// Create a new builder for `ScanConfig`.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ScanConfig`].
#[derive(Debug)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn format(mut self, format: DocumentFormat) -> Self {
        self.config.format = Some(format);
        self
    }

    pub fn pages(mut self, n: usize) -> Self {
        self.config.pages = n;
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn max_candidates_per_page(mut self, n: usize) -> Self {
        self.config.max_candidates_per_page = n.max(1);
        self
    }

    pub fn max_render_pixels(mut self, px: u32) -> Self {
        self.config.max_render_pixels = px.max(100);
        self
    }

    pub fn ocr_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.ocr_model_dir = Some(dir.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScanConfig, ExtractError> {
        let c = &self.config;
        if c.pages == 0 {
            return Err(ExtractError::InvalidConfig(
                "page count must be at least 1".into(),
            ));
        }
        if c.language.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "language tag must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_case_insensitively() {
        assert_eq!(DocumentFormat::from_tag("PDF").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_tag("djv").unwrap(), DocumentFormat::Djvu);
        assert_eq!(
            DocumentFormat::from_tag("DjVu").unwrap(),
            DocumentFormat::Djvu
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = DocumentFormat::from_tag("epub").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat { .. }));
    }

    #[test]
    fn format_inferred_from_extension() {
        assert_eq!(
            DocumentFormat::from_extension(Path::new("book.djvu")),
            Some(DocumentFormat::Djvu)
        );
        assert_eq!(
            DocumentFormat::from_extension(Path::new("paper.PDF")),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(DocumentFormat::from_extension(Path::new("notes.txt")), None);
        assert_eq!(DocumentFormat::from_extension(Path::new("no_ext")), None);
    }

    #[test]
    fn zero_pages_fails_validation() {
        let err = ScanConfig::builder().pages(0).build().unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn empty_language_fails_validation() {
        let err = ScanConfig::builder().pages(1).language("  ").build();
        assert!(err.is_err());
    }

    #[test]
    fn candidate_cap_is_clamped_to_one() {
        let config = ScanConfig::builder()
            .pages(1)
            .max_candidates_per_page(0)
            .build()
            .unwrap();
        assert_eq!(config.max_candidates_per_page, 1);
    }
}
