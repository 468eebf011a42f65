//! The page buffer entity and the two external-collaborator contracts.
//!
//! [`RasterPage`] is plain data: one decoded page's pixels plus geometry.
//! [`PageSource`] and [`TextRecognizer`] are the seams where format-specific
//! rasterizers and the OCR engine plug in. The pipeline in [`crate::scan`]
//! only ever talks to these traits, so a new document format or a different
//! OCR backend is a new impl, not a pipeline change — and tests can drive
//! the whole pipeline with in-memory mocks.

use std::path::Path;

use crate::error::ExtractError;

/// One decoded page rendered to an owned pixel buffer plus geometry.
///
/// Pixels are packed interleaved rows: `bytes_per_pixel` is the true channel
/// count (3 for packed RGB), `stride` is the byte length of one row and may
/// exceed `width * bytes_per_pixel` when the producer pads rows. The buffer
/// length is exactly `stride * height`.
///
/// Ownership is linear: a provider creates the page, the pipeline moves it
/// into one page-processing step, and the buffer is dropped before the next
/// page begins.
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// Page width in pixels.
    pub width: u32,
    /// Page height in pixels.
    pub height: u32,
    /// Channel count × bytes per channel (3 for packed 8-bit RGB).
    pub bytes_per_pixel: u32,
    /// Bytes per row, including any padding.
    pub stride: u32,
    /// Owned pixel data, exactly `stride * height` bytes.
    pub pixels: Vec<u8>,
}

impl RasterPage {
    /// Wrap a tightly-packed 8-bit RGB buffer (`stride == width * 3`).
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes_per_pixel: 3,
            stride: width * 3,
            pixels,
        }
    }

    /// The buffer length implied by the declared geometry.
    pub fn expected_len(&self) -> usize {
        self.stride as usize * self.height as usize
    }

    /// Whether the declared geometry and the buffer agree.
    ///
    /// Checked by the pipeline before a page is handed to a recognizer; a
    /// mismatch is a per-page error, never a panic.
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.stride >= self.width * self.bytes_per_pixel
            && self.pixels.len() == self.expected_len()
    }

    /// Rows without padding, as one contiguous packed buffer.
    ///
    /// Borrows when the buffer is already tightly packed; copies row prefixes
    /// otherwise.
    pub fn packed_rows(&self) -> std::borrow::Cow<'_, [u8]> {
        let row = (self.width * self.bytes_per_pixel) as usize;
        let stride = self.stride as usize;
        if row == stride {
            return std::borrow::Cow::Borrowed(&self.pixels);
        }
        let mut packed = Vec::with_capacity(row * self.height as usize);
        for chunk in self.pixels.chunks_exact(stride) {
            packed.extend_from_slice(&chunk[..row]);
        }
        std::borrow::Cow::Owned(packed)
    }
}

/// A format-specific provider that turns a document into raster pages.
///
/// # Contract
///
/// * `page_count` must be strictly below the document's total page count;
///   otherwise the call fails with [`ExtractError::PageOutOfRange`].
/// * A missing or unreadable document fails with `FileNotFound` /
///   `PermissionDenied` / `Io`; an unparseable one with `CorruptDocument`.
/// * On full success the returned vector has length exactly `page_count`,
///   in document order, each buffer independently owned by the caller.
/// * If a page fails to decode mid-sequence, the provider returns the pages
///   produced so far (`Ok` with a shorter vector). The pipeline treats the
///   short count as a hard stop, not a per-page skip.
pub trait PageSource {
    /// Human-readable provider label, used in diagnostics.
    fn label(&self) -> &'static str;

    /// Rasterize the first `page_count` pages of `document`.
    fn extract_pages(
        &self,
        document: &Path,
        page_count: usize,
    ) -> Result<Vec<RasterPage>, ExtractError>;
}

/// Per-call failure of a [`TextRecognizer`].
///
/// The pipeline wraps this into [`crate::error::PageError::RecognitionFailed`]
/// with the page index attached; recognizers themselves are page-agnostic.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct RecognizeError(String);

impl RecognizeError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// An OCR engine that turns one raster page into recognized text.
///
/// One instance is constructed per run and reused across every page of the
/// document; implementations may keep model state warm between calls and
/// must not assume re-initialisation between pages. Empty text is a valid
/// success — `Err` means the engine could not produce a result at all.
pub trait TextRecognizer {
    /// Recognize the text on one page.
    fn recognize(&mut self, page: &RasterPage) -> Result<String, RecognizeError>;
}
