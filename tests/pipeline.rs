//! End-to-end pipeline tests with in-memory collaborators.
//!
//! No document file, no OCR models: a mock page provider hands the pipeline
//! synthetic raster pages, and a mock recognizer maps each page to scripted
//! text. What these tests exercise is everything in between — page-count
//! contracts, per-page failure recovery, candidate collection, and stats.

use std::path::Path;

use isbn_extract::{
    scan_with, ExtractError, PageError, PageSource, RasterPage, RecognizeError, ScanConfig,
    TextRecognizer,
};

/// A provider that serves pre-built pages from a fixed document.
struct FixedSource {
    /// The document's total page count; requests must stay strictly below it.
    total: usize,
    /// Pages served in order; may be shorter than the request to simulate a
    /// mid-sequence decode failure.
    pages: Vec<RasterPage>,
}

impl PageSource for FixedSource {
    fn label(&self) -> &'static str {
        "fixed"
    }

    fn extract_pages(
        &self,
        _document: &Path,
        page_count: usize,
    ) -> Result<Vec<RasterPage>, ExtractError> {
        if page_count >= self.total {
            return Err(ExtractError::PageOutOfRange {
                requested: page_count,
                total: self.total,
            });
        }
        Ok(self.pages.iter().take(page_count).cloned().collect())
    }
}

/// A recognizer that replays scripted per-page results.
struct ScriptedRecognizer {
    script: Vec<Result<String, String>>,
    next: usize,
}

impl ScriptedRecognizer {
    fn new(script: Vec<Result<&str, &str>>) -> Self {
        Self {
            script: script
                .into_iter()
                .map(|r| r.map(String::from).map_err(String::from))
                .collect(),
            next: 0,
        }
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&mut self, _page: &RasterPage) -> Result<String, RecognizeError> {
        let result = self.script[self.next].clone();
        self.next += 1;
        result.map_err(RecognizeError::new)
    }
}

fn blank_page() -> RasterPage {
    RasterPage::from_rgb(8, 8, vec![0xFF; 8 * 8 * 3])
}

fn config(pages: usize) -> ScanConfig {
    ScanConfig::builder().pages(pages).build().unwrap()
}

#[test]
fn full_run_collects_sorted_candidates() {
    let source = FixedSource {
        total: 10,
        pages: vec![blank_page(), blank_page()],
    };
    let mut recognizer = ScriptedRecognizer::new(vec![
        Ok("ISBN-13: 978-0-13-468599-1 and isbn 0201633612"),
        Ok("no numbers on this page"),
    ]);

    let output = scan_with(&source, &mut recognizer, Path::new("book.pdf"), &config(2)).unwrap();

    assert_eq!(output.pages.len(), 2);
    let normalized: Vec<&str> = output.pages[0]
        .candidates
        .iter()
        .map(|c| c.normalized.as_str())
        .collect();
    assert_eq!(normalized, vec!["0201633612", "9780134685991"]);
    assert!(output.pages[1].candidates.is_empty());
    assert!(output.pages[1].is_ok());

    assert_eq!(output.stats.requested_pages, 2);
    assert_eq!(output.stats.processed_pages, 2);
    assert_eq!(output.stats.failed_pages, 0);
    assert_eq!(output.stats.total_candidates, 2);
}

#[test]
fn short_page_set_aborts_the_run() {
    // The source produces 1 page where 3 were requested: a mid-sequence
    // decode failure. The run must abort, not report a partial result.
    let source = FixedSource {
        total: 10,
        pages: vec![blank_page()],
    };
    let mut recognizer = ScriptedRecognizer::new(vec![Ok("isbn 0201633612")]);

    let err = scan_with(&source, &mut recognizer, Path::new("book.pdf"), &config(3)).unwrap_err();
    match err {
        ExtractError::IncompletePageSet {
            produced,
            requested,
        } => {
            assert_eq!(produced, 1);
            assert_eq!(requested, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn requesting_the_whole_document_is_out_of_range() {
    let source = FixedSource {
        total: 3,
        pages: vec![blank_page(), blank_page(), blank_page()],
    };
    let mut recognizer = ScriptedRecognizer::new(vec![]);

    // Equal to the total is already out of range; at least one page must
    // remain unread.
    let err = scan_with(&source, &mut recognizer, Path::new("book.pdf"), &config(3)).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::PageOutOfRange {
            requested: 3,
            total: 3
        }
    ));
}

#[test]
fn failed_page_is_recovered_and_the_run_continues() {
    let source = FixedSource {
        total: 10,
        pages: vec![blank_page(), blank_page(), blank_page()],
    };
    let mut recognizer = ScriptedRecognizer::new(vec![
        Ok("isbn 0-306-40615-2"),
        Err("engine produced no output"),
        Ok("ISBN 978-0-306-40615-7"),
    ]);

    let output = scan_with(&source, &mut recognizer, Path::new("book.pdf"), &config(3)).unwrap();

    assert_eq!(output.pages.len(), 3);
    assert_eq!(output.pages[0].candidates[0].normalized, "0306406152");
    assert!(output.pages[2].is_ok());
    assert_eq!(output.pages[2].candidates[0].normalized, "9780306406157");

    let failed = &output.pages[1];
    assert!(!failed.is_ok());
    assert!(failed.candidates.is_empty());
    match failed.error.as_ref().unwrap() {
        PageError::RecognitionFailed { page, detail } => {
            assert_eq!(*page, 1);
            assert!(detail.contains("no output"));
        }
        other => panic!("unexpected page error: {other:?}"),
    }

    assert_eq!(output.stats.processed_pages, 2);
    assert_eq!(output.stats.failed_pages, 1);
    assert_eq!(output.stats.total_candidates, 2);
}

#[test]
fn malformed_buffer_is_a_per_page_error() {
    let bad = RasterPage::from_rgb(8, 8, vec![0xFF; 10]);
    let source = FixedSource {
        total: 10,
        pages: vec![blank_page(), bad],
    };
    // The malformed page never reaches the recognizer.
    let mut recognizer = ScriptedRecognizer::new(vec![Ok("isbn 0201633612")]);

    let output = scan_with(&source, &mut recognizer, Path::new("book.pdf"), &config(2)).unwrap();

    assert!(output.pages[0].is_ok());
    match output.pages[1].error.as_ref().unwrap() {
        PageError::BadBuffer { page, got, expected } => {
            assert_eq!(*page, 1);
            assert_eq!(*got, 10);
            assert_eq!(*expected, 8 * 8 * 3);
        }
        other => panic!("unexpected page error: {other:?}"),
    }
    assert_eq!(output.stats.failed_pages, 1);
}

#[test]
fn duplicate_isbns_on_one_page_collapse() {
    let source = FixedSource {
        total: 5,
        pages: vec![blank_page()],
    };
    let mut recognizer = ScriptedRecognizer::new(vec![Ok(
        "isbn 0-201-63361-2 ... ISBN: 0 201 63361 2 ... isbn 0201633612",
    )]);

    let output = scan_with(&source, &mut recognizer, Path::new("book.pdf"), &config(1)).unwrap();
    assert_eq!(output.pages[0].candidates.len(), 1);
    assert_eq!(output.pages[0].candidates[0].normalized, "0201633612");
}

#[test]
fn candidate_cap_bounds_a_noisy_page() {
    let source = FixedSource {
        total: 5,
        pages: vec![blank_page()],
    };
    let noisy = (0..100)
        .map(|i| format!("isbn {:010}", i))
        .collect::<Vec<_>>()
        .join(" ");
    let mut recognizer = ScriptedRecognizer {
        script: vec![Ok(noisy)],
        next: 0,
    };

    let config = ScanConfig::builder()
        .pages(1)
        .max_candidates_per_page(8)
        .build()
        .unwrap();
    let output = scan_with(&source, &mut recognizer, Path::new("book.pdf"), &config).unwrap();
    assert_eq!(output.pages[0].candidates.len(), 8);
}

#[test]
fn empty_text_is_a_successful_page() {
    let source = FixedSource {
        total: 5,
        pages: vec![blank_page()],
    };
    let mut recognizer = ScriptedRecognizer::new(vec![Ok("")]);

    let output = scan_with(&source, &mut recognizer, Path::new("book.pdf"), &config(1)).unwrap();
    assert!(output.pages[0].is_ok());
    assert_eq!(output.pages[0].text_len, 0);
    assert!(output.pages[0].candidates.is_empty());
    assert_eq!(output.stats.processed_pages, 1);
}
