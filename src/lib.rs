//! # isbn-extract
//!
//! Extract ISBN numbers from scanned PDF and DjVu documents.
//!
//! ## Why this crate?
//!
//! Scanned books carry no embedded text layer, so grepping the file for an
//! ISBN finds nothing. This crate rasterises the leading pages (where
//! imprint and copyright pages live), runs OCR over each page, and scans
//! the recognized text for ISBN-shaped substrings, normalizing and
//! deduplicating what it finds.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document
//!  │
//!  ├─ 1. Resolve  local file + format tag (pdf / djvu)
//!  ├─ 2. Extract  rasterise the first N pages (pdfium / djvulibre)
//!  ├─ 3. OCR      recognize each page's text (ocrs + rten models)
//!  ├─ 4. Match    scan text for ISBN tokens, normalize, dedup
//!  └─ 5. Output   per-page candidate lists + run stats
//! ```
//!
//! Pages are processed strictly one at a time; each page's pixel buffer is
//! dropped before the next page begins. A page whose recognition fails is
//! reported with zero candidates and the run continues.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use isbn_extract::{scan, ScanConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::builder().pages(5).build()?;
//!     let output = scan("book.pdf", &config)?;
//!     for page in &output.pages {
//!         for candidate in &page.candidates {
//!             println!("{}", candidate.normalized);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `isbn-extract` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! isbn-extract = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod matcher;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod scan;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DocumentFormat, ScanConfig, ScanConfigBuilder};
pub use error::{ExtractError, PageError};
pub use matcher::{IsbnCandidate, IsbnMatcher, DEFAULT_MAX_CANDIDATES};
pub use output::{PageScan, ScanOutput, ScanStats};
pub use page::{PageSource, RasterPage, RecognizeError, TextRecognizer};
pub use pipeline::{djvu::DjvuPageSource, ocr::OcrsRecognizer, pdf::PdfPageSource};
pub use scan::{scan, scan_with};
