//! CLI binary for isbn-extract.
//!
//! A thin shim over the library crate that maps CLI flags to `ScanConfig`
//! and prints results.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use isbn_extract::{scan, DocumentFormat, ScanConfig};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Scan the first 5 pages of a scanned book
  isbn-extract -n 5 book.pdf

  # DjVu input, explicit type tag
  isbn-extract -t djvu -n 3 -f scan.djv

  # Verbose per-page diagnostics on stderr
  isbn-extract -n 5 -v book.pdf

  # Structured JSON output (per-page candidates + stats)
  isbn-extract -n 5 --json book.pdf > result.json

ENVIRONMENT VARIABLES:
  ISBN_EXTRACT_MODEL_DIR  Directory containing the OCR model files
                          (text-detection.rten, text-recognition.rten)
  RUST_LOG                Override the tracing filter

SETUP:
  The OCR models are cached in ~/.cache/ocrs by default. Run the
  `ocrs-cli` tool once to download them, or fetch them from the
  ocrs-models releases and point --model-dir at the directory.

  DjVu input additionally needs the djvulibre tools (ddjvu, djvused)
  on PATH.
"#;

/// Extract ISBN numbers from scanned PDF and DjVu documents.
#[derive(Parser, Debug)]
#[command(
    name = "isbn-extract",
    version,
    about = "Extract ISBN numbers from scanned PDF and DjVu documents",
    long_about = "Rasterise the leading pages of a scanned document, recognize their text \
with OCR, and scan it for ISBN numbers. Prints one normalized ISBN per line, per page, \
in canonical order.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input document (alternative to --file).
    input: Option<PathBuf>,

    /// Input document path.
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Document type: pdf, djv, or djvu. Inferred from the extension if omitted.
    #[arg(short = 't', long = "type")]
    format: Option<String>,

    /// Number of pages to scan, from the start of the document.
    #[arg(short = 'n', long)]
    pages: usize,

    /// OCR language tag (ISO 639-3).
    #[arg(short = 'l', long, default_value = "eng")]
    lang: String,

    /// Upper bound on ISBN candidates collected per page.
    #[arg(long, default_value_t = isbn_extract::DEFAULT_MAX_CANDIDATES)]
    max_candidates: usize,

    /// Directory containing the OCR model files.
    #[arg(long, env = "ISBN_EXTRACT_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Output structured JSON (per-page candidates + stats) instead of plain lines.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Resolve input ────────────────────────────────────────────────────
    let input = match (&cli.file, &cli.input) {
        (Some(f), None) => f.clone(),
        (None, Some(p)) => p.clone(),
        (Some(_), Some(_)) => anyhow::bail!("give the input either as -f or positionally, not both"),
        (None, None) => anyhow::bail!("no input document given (use -f or a positional path)"),
    };

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ScanConfig::builder()
        .pages(cli.pages)
        .language(&cli.lang)
        .max_candidates_per_page(cli.max_candidates);
    if let Some(ref tag) = cli.format {
        builder = builder.format(DocumentFormat::from_tag(tag)?);
    }
    if let Some(ref dir) = cli.model_dir {
        builder = builder.ocr_model_dir(dir);
    }
    let config = builder.build().context("invalid configuration")?;

    // ── Run extraction ───────────────────────────────────────────────────
    let output = scan(&input, &config)
        .with_context(|| format!("extraction failed for {}", input.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("failed to serialise output")?
        );
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for page in &output.pages {
            for candidate in &page.candidates {
                writeln!(handle, "{}", candidate.normalized)
                    .context("failed to write to stdout")?;
            }
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "scanned {}/{} pages in {}ms ({} candidates)",
            output.stats.processed_pages,
            output.stats.requested_pages,
            output.stats.total_duration_ms,
            output.stats.total_candidates,
        );
        if output.stats.failed_pages > 0 {
            eprintln!("  {} pages failed recognition", output.stats.failed_pages);
        }
    }

    Ok(())
}
