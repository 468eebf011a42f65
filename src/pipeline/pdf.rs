//! PDF rasterization: render leading pages to RGB buffers via pdfium.
//!
//! ## Why cap pixels, not DPI?
//!
//! Page sizes vary wildly: an A0 poster at natural resolution would produce
//! a 12,000 × 17,000 px image. Capping the longest rendered edge keeps
//! memory bounded regardless of the page's physical size, and scanned-book
//! text stays comfortably legible for OCR around 2,000 px.

use std::path::Path;

use pdfium_render::prelude::*;
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::page::{PageSource, RasterPage};

/// Rasterizes PDF pages through the pdfium library.
pub struct PdfPageSource {
    max_pixels: u32,
}

impl PdfPageSource {
    pub fn new(max_pixels: u32) -> Self {
        Self { max_pixels }
    }
}

impl PageSource for PdfPageSource {
    fn label(&self) -> &'static str {
        "pdfium"
    }

    fn extract_pages(
        &self,
        document: &Path,
        page_count: usize,
    ) -> Result<Vec<RasterPage>, ExtractError> {
        let pdfium = Pdfium::default();

        let pdf = pdfium
            .load_pdf_from_file(document, None)
            .map_err(|e| ExtractError::CorruptDocument {
                path: document.to_path_buf(),
                detail: format!("{:?}", e),
            })?;

        let pages = pdf.pages();
        let total = pages.len() as usize;
        info!(total, "PDF loaded");

        // The request must leave at least one page unread; asking for the
        // whole document (or more) is a caller error, not a clamp.
        if page_count >= total {
            return Err(ExtractError::PageOutOfRange {
                requested: page_count,
                total,
            });
        }

        let render_config = PdfRenderConfig::new()
            .set_target_width(self.max_pixels as i32)
            .set_maximum_height(self.max_pixels as i32);

        let mut results: Vec<RasterPage> = Vec::new();
        results
            .try_reserve(page_count)
            .map_err(|_| ExtractError::AllocationFailed {
                what: "page buffer table".into(),
                needed: page_count,
            })?;

        for idx in 0..page_count {
            let page = match pages.get(idx as u16) {
                Ok(page) => page,
                Err(e) => {
                    // Partial result; the caller decides whether a short
                    // sequence aborts the run.
                    warn!(page = idx, error = ?e, "failed to open page, stopping");
                    break;
                }
            };

            let bitmap = match page.render_with_config(&render_config) {
                Ok(bitmap) => bitmap,
                Err(e) => {
                    warn!(page = idx, error = ?e, "failed to render page, stopping");
                    break;
                }
            };

            let rgb = bitmap.as_image().to_rgb8();
            let (width, height) = rgb.dimensions();
            debug!(page = idx, width, height, "page rendered");
            results.push(RasterPage::from_rgb(width, height, rgb.into_raw()));
        }

        Ok(results)
    }
}
