//! Run orchestration: drive one extraction run over one document.
//!
//! ## Run shape
//!
//! A run moves through fixed phases: resolve the input path, resolve the
//! format tag to a page provider, initialise the OCR engine, rasterize the
//! requested pages, then process them strictly one at a time in document
//! order. Setup-phase errors are fatal and abort before any output;
//! per-page recognition errors are recovered locally — the page reports
//! zero candidates and the run continues.
//!
//! ## Buffer lifetimes
//!
//! Each page's pixel buffer is moved into its own processing step and
//! dropped before the next page begins, on success and failure paths
//! alike. An aborted run (short page set) drops every already-extracted
//! buffer the same way. No page's data outlives its own iteration.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{DocumentFormat, ScanConfig};
use crate::error::{ExtractError, PageError};
use crate::matcher::IsbnMatcher;
use crate::output::{PageScan, ScanOutput, ScanStats};
use crate::page::{PageSource, RasterPage, TextRecognizer};
use crate::pipeline::{ocr::OcrsRecognizer, source_for};

/// Run a full extraction over `document` with the built-in providers.
///
/// This is the primary entry point for the library. The format comes from
/// `config.format`, falling back to the file extension; the OCR engine is
/// constructed once and reused for every page.
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal errors: unknown format,
/// unreadable document, OCR initialisation failure, or an incomplete page
/// set. Per-page recognition failures are reported inside the output.
pub fn scan(document: impl AsRef<Path>, config: &ScanConfig) -> Result<ScanOutput, ExtractError> {
    let document = document.as_ref();
    info!("starting extraction: {}", document.display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    resolve_local(document)?;

    // ── Step 2: Resolve format tag to a page provider ────────────────────
    let format = resolve_format(document, config)?;
    let source = source_for(format, config);
    debug!(provider = source.label(), "page provider selected");

    // ── Step 3: Initialise the OCR engine ────────────────────────────────
    let mut recognizer =
        OcrsRecognizer::new(&config.language, config.ocr_model_dir.as_deref())?;

    // ── Step 4: Extract and process pages ────────────────────────────────
    scan_with(source.as_ref(), &mut recognizer, document, config)
}

/// Run an extraction with caller-supplied collaborators.
///
/// The seam for tests and for embedding: any [`PageSource`] and
/// [`TextRecognizer`] pair can drive the pipeline. The contract checks —
/// exactly the requested page count or abort, scoped buffer release,
/// recoverable per-page recognition failure — all live here.
pub fn scan_with(
    source: &dyn PageSource,
    recognizer: &mut dyn TextRecognizer,
    document: &Path,
    config: &ScanConfig,
) -> Result<ScanOutput, ExtractError> {
    let total_start = Instant::now();

    // Pattern compilation is the matcher's only failure mode; surface it
    // before any page work happens.
    let matcher = IsbnMatcher::new(config.max_candidates_per_page)?;

    let extract_start = Instant::now();
    let pages = source.extract_pages(document, config.pages)?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    // Exactly the requested count, or the run aborts. A shorter sequence
    // means a page failed to decode mid-document; continuing would leave
    // downstream page indices ambiguous. Dropping `pages` here releases
    // every buffer extracted so far.
    if pages.len() != config.pages {
        warn!(
            produced = pages.len(),
            requested = config.pages,
            "provider returned an incomplete page set, aborting"
        );
        return Err(ExtractError::IncompletePageSet {
            produced: pages.len(),
            requested: config.pages,
        });
    }
    info!(
        pages = pages.len(),
        duration_ms = extract_duration_ms,
        "pages rasterized"
    );

    let ocr_start = Instant::now();
    let mut results = Vec::with_capacity(pages.len());
    for (index, page) in pages.into_iter().enumerate() {
        // `page` is owned by this iteration; its buffer is dropped when
        // `process_page` returns, whatever the outcome.
        results.push(process_page(index, page, recognizer, &matcher));
    }
    let ocr_duration_ms = ocr_start.elapsed().as_millis() as u64;

    let processed = results.iter().filter(|p| p.is_ok()).count();
    let failed = results.len() - processed;
    let total_candidates = results.iter().map(|p| p.candidates.len()).sum();

    let stats = ScanStats {
        requested_pages: config.pages,
        processed_pages: processed,
        failed_pages: failed,
        total_candidates,
        extract_duration_ms,
        ocr_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        processed,
        failed,
        candidates = stats.total_candidates,
        duration_ms = stats.total_duration_ms,
        "extraction complete"
    );

    Ok(ScanOutput {
        pages: results,
        stats,
    })
}

/// Process one page: recognize text, then scan it for ISBN candidates.
///
/// Never fails — a page that cannot be recognized yields an empty candidate
/// list plus its [`PageError`]. Takes the page by value so the pixel buffer
/// is released on return along every path.
fn process_page(
    index: usize,
    page: RasterPage,
    recognizer: &mut dyn TextRecognizer,
    matcher: &IsbnMatcher,
) -> PageScan {
    let (width, height) = (page.width, page.height);
    debug!(
        page = index,
        width,
        height,
        raster_kb = page.pixels.len() / 1024,
        "processing page"
    );

    if !page.is_well_formed() {
        warn!(page = index, "malformed raster buffer, skipping page");
        return PageScan {
            page_index: index,
            width,
            height,
            text_len: 0,
            candidates: vec![],
            error: Some(PageError::BadBuffer {
                page: index,
                got: page.pixels.len(),
                expected: page.expected_len(),
            }),
        };
    }

    match recognizer.recognize(&page) {
        Ok(text) => {
            debug!(page = index, text_len = text.len(), "text recognized");
            let candidates = matcher.scan(&text);
            debug!(page = index, candidates = candidates.len(), "page scanned");
            PageScan {
                page_index: index,
                width,
                height,
                text_len: text.len(),
                candidates,
                error: None,
            }
        }
        Err(e) => {
            warn!(page = index, error = %e, "recognition failed, page skipped");
            PageScan {
                page_index: index,
                width,
                height,
                text_len: 0,
                candidates: vec![],
                error: Some(PageError::RecognitionFailed {
                    page: index,
                    detail: e.to_string(),
                }),
            }
        }
    }
}

/// Resolve the format for a run: the explicit tag wins, then the extension.
fn resolve_format(document: &Path, config: &ScanConfig) -> Result<DocumentFormat, ExtractError> {
    if let Some(format) = config.format {
        return Ok(format);
    }
    DocumentFormat::from_extension(document).ok_or_else(|| ExtractError::UnsupportedFormat {
        tag: document
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("<none>")
            .to_string(),
    })
}

/// Validate a local document path, discriminating not-found from
/// permission-denied.
fn resolve_local(path: &Path) -> Result<(), ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    match std::fs::File::open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(ExtractError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let err = resolve_local(Path::new("/definitely/not/a/real/file.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }

    #[test]
    fn existing_file_resolves() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(resolve_local(file.path()).is_ok());
    }

    #[test]
    fn scan_rejects_unknown_format_before_any_page_work() {
        let file = tempfile::Builder::new()
            .suffix(".epub")
            .tempfile()
            .unwrap();
        let config = ScanConfig::builder().pages(1).build().unwrap();
        let err = scan(file.path(), &config).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat { .. }));
    }

    #[test]
    fn explicit_format_wins_over_extension() {
        let config = ScanConfig::builder()
            .pages(1)
            .format(DocumentFormat::Djvu)
            .build()
            .unwrap();
        let format = resolve_format(Path::new("misnamed.pdf"), &config).unwrap();
        assert_eq!(format, DocumentFormat::Djvu);
    }

    #[test]
    fn unknown_extension_without_tag_is_fatal() {
        let config = ScanConfig::builder().pages(1).build().unwrap();
        let err = resolve_format(Path::new("book.epub"), &config).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat { .. }));
    }
}
