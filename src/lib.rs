//! # pdf-ocr
//!
//! Split a PDF into single-page files and transcribe each page with the
//! Anthropic Messages API.
//!
//! ## Why split first?
//!
//! Multimodal APIs cap the size of a single document payload, and a model
//! asked to transcribe fifty pages in one request drifts, skips, and
//! summarises. Sending exactly one page per request keeps each payload
//! small, keeps the model honest, and makes the result file's page markers
//! a faithful map of the source document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input       validate the path and %PDF magic bytes
//!  ├─ 2. Split       one page_<n>.pdf per page via lopdf (spawn_blocking)
//!  ├─ 3. Encode      page bytes → base64 document payload
//!  ├─ 4. Transcribe  one sequential Messages API call per page
//!  └─ 5. Aggregate   "--- Page N ---" sections, ascending order, one file
//! ```
//!
//! Execution is strictly sequential: each page blocks until its response
//! arrives, and the first failure aborts the run with nothing written.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_ocr::{run_to_file, OcrConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key read from ANTHROPIC_API_KEY when not set on the config
//!     let config = OcrConfig::default();
//!     let stats = run_to_file("document.pdf", "ocr_results.txt", &config).await?;
//!     eprintln!("{} pages, {} tokens out",
//!         stats.total_pages, stats.total_output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfocr` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-ocr = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{OcrConfig, OcrConfigBuilder, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
pub use error::{ErrorKind, OcrError};
pub use output::{page_marker, PageTranscription, RunOutput, RunStats};
pub use pipeline::encode::{encode_pdf_bytes, DocumentData};
pub use pipeline::split::PageFile;
pub use pipeline::transcribe::{ClaudeTranscriber, Transcriber, Transcription};
pub use progress::{ProgressCallback, RunProgress};
pub use run::{assemble_report, run, run_from_bytes, run_to_file};
