//! ISBN pattern scanning: find, normalize, and deduplicate ISBN-shaped
//! substrings in one page's recognized text.
//!
//! ## The pattern
//!
//! A match is the literal token `isbn` (case-insensitive), optional
//! separators (dash, space, tab, parentheses), an optional edition marker
//! (`10` or `13`), further optional separators or a colon, then the capture
//! group: a run of digits interspersed with separators, terminated by a
//! digit or the literal `x`/`X` ISBN-10 check digit. Only the capture group
//! is retained; the keyword and edition marker are anchors.
//!
//! The separator classes between the keyword and the number deliberately
//! exclude digits, and the keyword-side class is greedy: on input like
//! `ISBN-13: 978-…` the `13` must be consumed as the edition marker, not
//! captured as the number itself.
//!
//! ## The scan
//!
//! The scan is iterative, not single-shot. A cursor walks the text; after
//! each match it advances to the end of the *whole* matched region, so the
//! next search starts strictly after the consumed text. If a pattern ever
//! produced a zero-width whole match the cursor is forced forward by one
//! character — the scan must terminate in at most O(text length) steps for
//! any input. This guard is an invariant, not an optional safeguard.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// The ISBN token pattern. Group 1 is the discardable edition marker,
/// group 2 the captured number span.
const ISBN_PATTERN: &str = r"(?i)isbn[-\t ()]*(1[03])?[-): \t]*([-\d \t]+[\dxX])";

/// Default per-page cap on collected candidates.
///
/// An explicit upper bound on how many matches one page may contribute,
/// keeping memory and output size predictable on garbage OCR text.
pub const DEFAULT_MAX_CANDIDATES: usize = 64;

static DEFAULT_REGEX: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(ISBN_PATTERN));

/// One matched, normalized ISBN-shaped substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsbnCandidate {
    /// The exact capture-group span, interior separators included.
    pub raw: String,
    /// `raw` with separator characters stripped: digits in order plus at
    /// most one trailing `x`/`X` check digit, case preserved as matched.
    pub normalized: String,
}

/// Scans recognized text for ISBN-shaped substrings.
///
/// Construction compiles the pattern; a malformed pattern is the matcher's
/// only failure mode and is reported once, before any page is processed.
/// Scanning itself cannot fail — it yields zero or more candidates.
#[derive(Debug, Clone)]
pub struct IsbnMatcher {
    pattern: Regex,
    max_candidates: usize,
}

impl IsbnMatcher {
    /// Build a matcher with the given per-page candidate cap.
    pub fn new(max_candidates: usize) -> Result<Self, ExtractError> {
        let pattern = match &*DEFAULT_REGEX {
            Ok(re) => re.clone(),
            Err(e) => return Err(ExtractError::PatternInvalid(e.clone())),
        };
        Ok(Self {
            pattern,
            max_candidates: max_candidates.max(1),
        })
    }

    /// Scan one page's text and return its candidate set.
    ///
    /// The result is deduplicated by `normalized` value and sorted
    /// lexicographically by it — the canonical emission order. Running the
    /// scan twice on the same text yields the same set.
    pub fn scan(&self, text: &str) -> Vec<IsbnCandidate> {
        let mut found: Vec<IsbnCandidate> = Vec::new();
        let mut cursor = 0usize;

        while found.len() < self.max_candidates {
            let Some(caps) = self.pattern.captures_at(text, cursor) else {
                break;
            };
            let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((cursor, cursor));

            // Group 1 (edition marker) is an anchor; only group 2 is kept.
            if let Some(group) = caps.get(2) {
                let raw = group.as_str().to_string();
                let normalized: String =
                    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
                found.push(IsbnCandidate { raw, normalized });
            }

            // Advance past the whole matched region. A zero-width match must
            // still move the cursor by one character or the loop never ends.
            if whole.1 > cursor {
                cursor = whole.1;
            } else {
                cursor = next_char_boundary(text, cursor);
                if cursor >= text.len() {
                    break;
                }
            }
        }

        found.sort_by(|a, b| a.normalized.cmp(&b.normalized));
        found.dedup_by(|a, b| a.normalized == b.normalized);
        found
    }

    /// Like [`scan`](Self::scan), but returns only the normalized strings.
    pub fn scan_normalized(&self, text: &str) -> Vec<String> {
        self.scan(text).into_iter().map(|c| c.normalized).collect()
    }
}

/// Smallest char boundary strictly greater than `at` (or `text.len()`).
fn next_char_boundary(text: &str, at: usize) -> usize {
    let mut i = at + 1;
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i.min(text.len())
}
