//! CLI binary for pdf-ocr.
//!
//! A thin shim over the library crate that maps CLI flags to `OcrConfig`
//! and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_ocr::{run_to_file, OcrConfig, ProgressCallback, RunProgress};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per page.
/// Pages always complete in order (the pipeline is sequential), so no
/// out-of-order handling is needed.
struct CliProgress {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgress {
    /// Create a callback whose bar length is set by `on_split_complete`.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set once the split is done

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Splitting");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }
}

impl RunProgress for CliProgress {
    fn on_split_complete(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Transcribing");
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Split into {total_pages} pages, transcribing…"))
        ));
    }

    fn on_page_start(&self, page: usize, _total: usize) {
        self.start_times
            .lock()
            .unwrap()
            .insert(page, Instant::now());
        self.bar.set_message(format!("page {page}"));
    }

    fn on_page_complete(&self, page: usize, total: usize, text_len: usize) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&page)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            page,
            total,
            dim(&format!("{text_len:>5} chars")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages transcribed",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic run: split, transcribe, write ocr_results.txt
  pdfocr book.pdf

  # Custom output locations
  pdfocr book.pdf --output-dir pages --result-file book_text.txt

  # Different model, tighter token budget
  pdfocr --model claude-3-7-sonnet-latest --max-tokens 2000 scan.pdf

  # Delete the single-page PDFs after each successful transcription
  pdfocr --cleanup book.pdf

  # Custom transcription instructions
  pdfocr --system-prompt prompt.txt manuscript.pdf

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY   API key (required)
  PDFOCR_MODEL        Override the model ID

OUTPUT FORMAT:
  The result file contains every page's transcription in ascending page
  order, each preceded by a marker line:

    --- Page 1 ---
    <transcribed text>

    --- Page 2 ---
    ...

SETUP:
  1. Set API key:  export ANTHROPIC_API_KEY=sk-ant-...
  2. Run:          pdfocr document.pdf
"#;

/// Split a PDF into pages and transcribe each with the Anthropic API.
#[derive(Parser, Debug)]
#[command(
    name = "pdfocr",
    version,
    about = "Split a PDF into pages and OCR each with the Anthropic API",
    long_about = "Split a PDF document into single-page PDFs, transcribe each page with the \
Anthropic Messages API (one sequential request per page), and write the results to a single \
text file with per-page markers.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file.
    pdf_path: PathBuf,

    /// Output directory for the single-page PDFs.
    #[arg(long, default_value = "split_pdfs")]
    output_dir: PathBuf,

    /// File to save OCR results.
    #[arg(long, default_value = "ocr_results.txt")]
    result_file: PathBuf,

    /// Model ID sent with every request.
    #[arg(long, env = "PDFOCR_MODEL", default_value = pdf_ocr::DEFAULT_MODEL)]
    model: String,

    /// Max tokens the model may generate per page.
    #[arg(long, default_value_t = pdf_ocr::DEFAULT_MAX_TOKENS)]
    max_tokens: usize,

    /// Path to a text file containing a custom system prompt.
    #[arg(long)]
    system_prompt: Option<PathBuf>,

    /// Delete each single-page PDF after its transcription succeeds.
    #[arg(long)]
    cleanup: bool,

    /// Per-page API timeout in seconds.
    #[arg(long, default_value_t = 120)]
    api_timeout: u64,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active; the
    // bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── API key check ────────────────────────────────────────────────────
    // Fail before any processing: no directory creation, no split files.
    let api_key = std::env::var("ANTHROPIC_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .context(
            "ANTHROPIC_API_KEY environment variable not set.\n\
             Export it before running: export ANTHROPIC_API_KEY=sk-ant-...",
        )?;

    // ── Build config ─────────────────────────────────────────────────────
    let system_prompt = match cli.system_prompt {
        Some(ref path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {path:?}"))?,
        ),
        None => None,
    };

    let mut builder = OcrConfig::builder()
        .api_key(api_key)
        .model(&cli.model)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout)
        .page_dir(&cli.output_dir)
        .keep_page_files(!cli.cleanup);

    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }
    if show_progress {
        let cb = CliProgress::new_dynamic();
        builder = builder.progress(cb as ProgressCallback);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let stats = run_to_file(&cli.pdf_path, &cli.result_file, &config)
        .await
        .context("OCR run failed")?;

    if !cli.quiet {
        eprintln!(
            "{}  {} pages  {}ms  →  {}",
            green("✔"),
            stats.total_pages,
            stats.total_duration_ms,
            bold(&cli.result_file.display().to_string()),
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&stats.total_input_tokens.to_string()),
            dim(&stats.total_output_tokens.to_string()),
        );
    }

    Ok(())
}
