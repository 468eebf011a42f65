//! Concrete providers behind the pipeline's trait seams.
//!
//! Each submodule implements exactly one collaborator. Keeping providers
//! separate makes each independently testable and lets us swap a backend
//! (a different PDF renderer, a different OCR engine) without touching the
//! run orchestration in [`crate::scan`].
//!
//! ## Data Flow
//!
//! ```text
//! document ──▶ pdf | djvu ──▶ ocr ──▶ matcher
//! (path)       (rasterize)    (text)  (candidates)
//! ```
//!
//! 1. [`pdf`]  — rasterize PDF pages through pdfium
//! 2. [`djvu`] — rasterize DjVu pages through the djvulibre reference
//!    decoder, driven as a subprocess
//! 3. [`ocr`]  — recognize text with the pure-Rust `ocrs` engine

pub mod djvu;
pub mod ocr;
pub mod pdf;

use crate::config::{DocumentFormat, ScanConfig};
use crate::page::PageSource;

/// Resolve a format to its page provider.
pub fn source_for(format: DocumentFormat, config: &ScanConfig) -> Box<dyn PageSource> {
    match format {
        DocumentFormat::Pdf => Box::new(pdf::PdfPageSource::new(config.max_render_pixels)),
        DocumentFormat::Djvu => Box::new(djvu::DjvuPageSource::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_format_resolves_to_its_provider() {
        let config = ScanConfig::default();
        assert_eq!(source_for(DocumentFormat::Pdf, &config).label(), "pdfium");
        assert_eq!(
            source_for(DocumentFormat::Djvu, &config).label(),
            "djvulibre"
        );
    }
}
