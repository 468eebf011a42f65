//! Result types for an extraction run.
//!
//! One [`PageScan`] per processed page, in document order, plus run-level
//! [`ScanStats`]. Candidates live on the page that produced them — the
//! pipeline never merges candidate sets across pages, so per-page reporting
//! stays unambiguous even when the same ISBN appears on several pages.

use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::matcher::IsbnCandidate;

/// The result of scanning one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageScan {
    /// Zero-based page index within the document.
    pub page_index: usize,
    /// Rendered page width in pixels.
    pub width: u32,
    /// Rendered page height in pixels.
    pub height: u32,
    /// Byte length of the recognized text (0 when recognition failed).
    pub text_len: usize,
    /// Deduplicated candidates, sorted by normalized form.
    pub candidates: Vec<IsbnCandidate>,
    /// The recoverable error that left this page without candidates, if any.
    pub error: Option<PageError>,
}

impl PageScan {
    /// Whether this page was recognized and scanned successfully.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Statistics for one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStats {
    /// Pages requested via configuration.
    pub requested_pages: usize,
    /// Pages that produced recognized text and were scanned.
    pub processed_pages: usize,
    /// Pages that failed recognition (reported with zero candidates).
    pub failed_pages: usize,
    /// Candidates emitted across all pages (per-page dedup applied,
    /// cross-page repeats counted per page).
    pub total_candidates: usize,
    /// Wall-clock time spent rasterizing pages.
    pub extract_duration_ms: u64,
    /// Wall-clock time spent in recognition and matching.
    pub ocr_duration_ms: u64,
    /// Total wall-clock time for the run.
    pub total_duration_ms: u64,
}

/// The complete output of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutput {
    /// Per-page results, in document order.
    pub pages: Vec<PageScan>,
    /// Run statistics.
    pub stats: ScanStats,
}
