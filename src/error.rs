//! Error types for the isbn-extract library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the run cannot proceed at all (unknown
//!   format tag, unreadable document, OCR engine failed to initialise,
//!   fewer pages decoded than requested). Returned as `Err(ExtractError)`
//!   from the top-level `scan*` functions before or instead of any output.
//!
//! * [`PageError`] — **Non-fatal**: a single page failed (recognition
//!   glitch, malformed raster buffer) but all other pages are fine. Stored
//!   inside [`crate::output::PageScan`] so callers can inspect partial
//!   success rather than losing the whole document to one bad page.
//!
//! The one asymmetry worth knowing: an *incomplete page set* is fatal, not
//! per-page. If the rasterizer decodes fewer pages than requested, the page
//! indices of everything downstream would no longer line up with the
//! document, so the run aborts instead of skipping.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the isbn-extract library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::PageScan`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Document was not found at the given path.
    #[error("document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the document.
    #[error("permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// An I/O operation on the document failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The type tag matched no known page provider.
    #[error("unsupported document type '{tag}'\nSupported: pdf, djv, djvu")]
    UnsupportedFormat { tag: String },

    // ── Rasterization errors ──────────────────────────────────────────────
    /// The document container could not be opened or parsed at all.
    #[error("document '{path}' could not be opened: {detail}")]
    CorruptDocument { path: PathBuf, detail: String },

    /// The requested page count is not strictly below the document's total.
    ///
    /// Page indices are zero-based, so a document with `total` pages can
    /// satisfy at most `total - 1` as a requested count.
    #[error("requested {requested} pages but the document has {total}\nThe page count must be strictly below the document total.")]
    PageOutOfRange { requested: usize, total: usize },

    /// The provider decoded fewer pages than requested.
    ///
    /// Partial extraction is a hard stop: continuing would desynchronize
    /// page indices between the report and the document.
    #[error("page extraction incomplete: {produced}/{requested} pages decoded")]
    IncompletePageSet { produced: usize, requested: usize },

    /// A raster or bookkeeping buffer could not be allocated.
    #[error("failed to allocate {needed} bytes for {what}")]
    AllocationFailed { what: String, needed: usize },

    /// An external decoder binary required by a provider is missing.
    #[error("required external tool '{tool}' was not found on PATH\n{hint}")]
    ToolUnavailable { tool: String, hint: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The text recognizer rejected its initialisation (bad language tag,
    /// missing or corrupt model files).
    #[error("OCR engine initialisation failed: {detail}")]
    EngineInitFailed { detail: String },

    // ── Matcher errors ────────────────────────────────────────────────────
    /// The ISBN pattern failed to compile at startup. Reported once, before
    /// any page is processed.
    #[error("ISBN pattern failed to compile: {0}")]
    PatternInvalid(#[source] regex::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored alongside [`crate::output::PageScan`] when a page fails.
/// The overall run continues to the next page.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The OCR engine could not produce text for this page.
    ///
    /// Distinct from recognising an empty page, which is a valid success
    /// with empty text.
    #[error("page {page}: text recognition failed: {detail}")]
    RecognitionFailed { page: usize, detail: String },

    /// The provider handed over a raster buffer whose size does not match
    /// its declared geometry.
    #[error("page {page}: malformed raster buffer ({got} bytes, expected {expected})")]
    BadBuffer {
        page: usize,
        got: usize,
        expected: usize,
    },
}
