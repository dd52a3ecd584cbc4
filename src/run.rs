//! Run entry points: split, transcribe page by page, assemble, write.
//!
//! The pipeline is strictly sequential. Each page's API call blocks until
//! the response arrives before the next page begins — one in-flight request,
//! no batching, no overlap. The first failure of any kind aborts the run
//! and nothing is written: the result file only exists after every page has
//! been transcribed.

use crate::config::OcrConfig;
use crate::error::OcrError;
use crate::output::{page_marker, PageTranscription, RunOutput, RunStats};
use crate::pipeline::transcribe::{ClaudeTranscriber, Transcriber};
use crate::pipeline::{encode, input, split};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Transcribe every page of a PDF.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `pdf_path` — path to the source PDF
/// * `config`   — run configuration
///
/// # Errors
/// Every error is fatal; pages transcribed before the failure are discarded.
/// The API key is resolved before anything touches the filesystem, so a
/// missing `ANTHROPIC_API_KEY` fails without creating the page directory.
pub async fn run(
    pdf_path: impl AsRef<Path>,
    config: &OcrConfig,
) -> Result<RunOutput, OcrError> {
    let total_start = Instant::now();
    let pdf_path = input::validate_pdf_path(pdf_path.as_ref())?;
    info!("Starting OCR run: {}", pdf_path.display());

    // Resolve the transcriber first: configuration errors must surface
    // before any file is written.
    let transcriber = resolve_transcriber(config)?;

    // ── Split ────────────────────────────────────────────────────────────
    let split_start = Instant::now();
    let page_files = split::split_pages(&pdf_path, &config.page_dir).await?;
    let split_duration_ms = split_start.elapsed().as_millis() as u64;
    let total = page_files.len();
    info!("Split into {total} pages in {split_duration_ms}ms");

    if let Some(ref cb) = config.progress {
        cb.on_split_complete(total);
    }

    // ── Transcribe, strictly in page order ───────────────────────────────
    let api_start = Instant::now();
    let mut pages: Vec<PageTranscription> = Vec::with_capacity(total);

    for page_file in &page_files {
        if let Some(ref cb) = config.progress {
            cb.on_page_start(page_file.page, total);
        }

        let bytes = tokio::fs::read(&page_file.path)
            .await
            .map_err(|e| OcrError::PageReadFailed {
                path: page_file.path.clone(),
                source: e,
            })?;
        let document = encode::encode_pdf_bytes(&bytes);

        let page_start = Instant::now();
        let transcription = transcriber
            .transcribe_page(page_file.page, document)
            .await?;
        let duration_ms = page_start.elapsed().as_millis() as u64;

        debug!(
            "Page {}/{}: {} chars in {}ms",
            page_file.page,
            total,
            transcription.text.len(),
            duration_ms
        );

        if !config.keep_page_files {
            if let Err(e) = tokio::fs::remove_file(&page_file.path).await {
                warn!("Failed to remove {}: {e}", page_file.path.display());
            }
        }

        if let Some(ref cb) = config.progress {
            cb.on_page_complete(page_file.page, total, transcription.text.len());
        }

        pages.push(PageTranscription {
            page: page_file.page,
            text: transcription.text,
            input_tokens: transcription.input_tokens,
            output_tokens: transcription.output_tokens,
            duration_ms,
        });
    }
    let api_duration_ms = api_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress {
        cb.on_run_complete(total);
    }

    // ── Assemble ─────────────────────────────────────────────────────────
    let report = assemble_report(&pages);

    let stats = RunStats {
        total_pages: total,
        total_input_tokens: pages.iter().map(|p| p.input_tokens as u64).sum(),
        total_output_tokens: pages.iter().map(|p| p.output_tokens as u64).sum(),
        split_duration_ms,
        api_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Run complete: {} pages, {}ms total",
        total, stats.total_duration_ms
    );

    Ok(RunOutput {
        report,
        pages,
        stats,
    })
}

/// Transcribe a PDF and write the report to `result_path`.
///
/// Overwrites any existing file at that path. Uses an atomic write (temp
/// file + rename) so a crash mid-write never leaves a truncated report.
pub async fn run_to_file(
    pdf_path: impl AsRef<Path>,
    result_path: impl AsRef<Path>,
    config: &OcrConfig,
) -> Result<RunStats, OcrError> {
    let output = run(pdf_path, config).await?;
    let path = result_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OcrError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, &output.report)
        .await
        .map_err(|e| OcrError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| OcrError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Report written to {}", path.display());
    Ok(output.stats)
}

/// Transcribe PDF bytes held in memory.
///
/// Writes `bytes` to a managed [`tempfile`] so the splitter has a path to
/// load; the temp file is cleaned up automatically on return or panic. Use
/// this when the PDF comes from a network stream or a database rather than
/// disk.
pub async fn run_from_bytes(bytes: &[u8], config: &OcrConfig) -> Result<RunOutput, OcrError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| OcrError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| OcrError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_path_buf();
    // `tmp` is dropped (and the file deleted) when `run` returns
    run(&path, config).await
}

/// Resolve the transcriber, from most-specific to least-specific.
///
/// 1. **Pre-built transcriber** (`config.transcriber`) — used as-is; this is
///    how tests inject mocks.
/// 2. **Explicit key** (`config.api_key`) — passed straight to
///    [`ClaudeTranscriber`].
/// 3. **Environment** — `ANTHROPIC_API_KEY`; the conventional setup for the
///    CLI.
fn resolve_transcriber(config: &OcrConfig) -> Result<Arc<dyn Transcriber>, OcrError> {
    if let Some(ref t) = config.transcriber {
        return Ok(Arc::clone(t));
    }

    let api_key = match config.api_key.as_deref() {
        Some(k) if !k.is_empty() => k.to_string(),
        _ => std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(OcrError::MissingApiKey)?,
    };

    Ok(Arc::new(ClaudeTranscriber::new(api_key, config)?))
}

/// Assemble the report: each page's text preceded by its marker, ascending
/// page order, one blank line between pages.
pub fn assemble_report(pages: &[PageTranscription]) -> String {
    let mut report = String::new();
    for page in pages {
        report.push_str(&page_marker(page.page));
        report.push('\n');
        report.push_str(&page.text);
        report.push_str("\n\n");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize, text: &str) -> PageTranscription {
        PageTranscription {
            page: n,
            text: text.to_string(),
            input_tokens: 0,
            output_tokens: 0,
            duration_ms: 0,
        }
    }

    #[test]
    fn report_preserves_page_order() {
        let pages = vec![page(1, "alpha"), page(2, "beta"), page(3, "gamma")];
        let report = assemble_report(&pages);

        let markers: Vec<&str> = report
            .lines()
            .filter(|l| l.starts_with("--- Page "))
            .collect();
        assert_eq!(
            markers,
            vec!["--- Page 1 ---", "--- Page 2 ---", "--- Page 3 ---"]
        );
        assert!(report.contains("--- Page 2 ---\nbeta\n"));
        assert!(report.ends_with("\n\n"));
    }

    #[test]
    fn empty_input_yields_empty_report() {
        assert_eq!(assemble_report(&[]), "");
    }

    #[test]
    fn markers_survive_marker_like_text() {
        // A page whose *text* contains a marker line is the page author's
        // problem; the assembler itself must emit exactly one per page.
        let pages = vec![page(1, "body"), page(2, "body")];
        let report = assemble_report(&pages);
        let count = report.matches("--- Page ").count();
        assert_eq!(count, 2);
    }
}
