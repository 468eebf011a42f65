//! DjVu rasterization through the djvulibre reference decoder.
//!
//! No maintained Rust binding for djvulibre exists, so this provider drives
//! the `ddjvu` and `djvused` command-line tools as subprocesses: `djvused`
//! reports the page total, `ddjvu` emits one page at a time as PPM on
//! stdout, decoded here with the `image` crate. Both tools ship in every
//! djvulibre package.

use std::path::Path;
use std::process::Command;

use image::ImageFormat;
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::page::{PageSource, RasterPage};

const DDJVU: &str = "ddjvu";
const DJVUSED: &str = "djvused";
const INSTALL_HINT: &str = "install the djvulibre package (provides ddjvu and djvused)";

/// Rasterizes DjVu pages by shelling out to djvulibre.
pub struct DjvuPageSource;

impl DjvuPageSource {
    pub fn new() -> Self {
        Self
    }

    /// Query the document's page total via `djvused -e n`.
    fn page_total(&self, document: &Path) -> Result<usize, ExtractError> {
        let output = Command::new(DJVUSED)
            .arg(document)
            .args(["-e", "n"])
            .output()
            .map_err(|e| tool_error(DJVUSED, document, e))?;

        if !output.status.success() {
            return Err(ExtractError::CorruptDocument {
                path: document.to_path_buf(),
                detail: format!(
                    "djvused exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse::<usize>()
            .map_err(|_| ExtractError::CorruptDocument {
                path: document.to_path_buf(),
                detail: format!("djvused reported a non-numeric page count: {:?}", stdout.trim()),
            })
    }

    /// Decode one page (1-based for ddjvu) to a packed RGB buffer.
    fn decode_page(&self, document: &Path, page_number: usize) -> Result<RasterPage, String> {
        let output = Command::new(DDJVU)
            .arg("-format=ppm")
            .arg(format!("-page={}", page_number))
            .arg(document)
            .output()
            .map_err(|e| format!("failed to run ddjvu: {}", e))?;

        if !output.status.success() {
            return Err(format!(
                "ddjvu exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let decoded = image::load_from_memory_with_format(&output.stdout, ImageFormat::Pnm)
            .map_err(|e| format!("ppm decode failed: {}", e))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(RasterPage::from_rgb(width, height, rgb.into_raw()))
    }
}

impl Default for DjvuPageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for DjvuPageSource {
    fn label(&self) -> &'static str {
        "djvulibre"
    }

    fn extract_pages(
        &self,
        document: &Path,
        page_count: usize,
    ) -> Result<Vec<RasterPage>, ExtractError> {
        let total = self.page_total(document)?;
        info!(total, "DjVu document opened");

        if page_count >= total {
            return Err(ExtractError::PageOutOfRange {
                requested: page_count,
                total,
            });
        }

        let mut results: Vec<RasterPage> = Vec::new();
        results
            .try_reserve(page_count)
            .map_err(|_| ExtractError::AllocationFailed {
                what: "page buffer table".into(),
                needed: page_count,
            })?;

        for idx in 0..page_count {
            // ddjvu numbers pages from 1.
            match self.decode_page(document, idx + 1) {
                Ok(page) => {
                    debug!(page = idx, width = page.width, height = page.height, "page decoded");
                    results.push(page);
                }
                Err(detail) => {
                    warn!(page = idx, detail, "failed to decode page, stopping");
                    break;
                }
            }
        }

        Ok(results)
    }
}

fn tool_error(tool: &'static str, document: &Path, e: std::io::Error) -> ExtractError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ExtractError::ToolUnavailable {
            tool: tool.to_string(),
            hint: INSTALL_HINT.to_string(),
        }
    } else {
        ExtractError::Io {
            path: document.to_path_buf(),
            source: e,
        }
    }
}
