//! Output types: per-page transcriptions, run statistics, and page markers.

use serde::{Deserialize, Serialize};

/// Render the human-readable marker that precedes a page's text in the
/// result file, e.g. `--- Page 3 ---`.
pub fn page_marker(page: usize) -> String {
    format!("--- Page {page} ---")
}

/// The transcription of a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTranscription {
    /// 1-indexed page number.
    pub page: usize,
    /// Text returned by the OCR API for this page.
    pub text: String,
    /// Prompt tokens billed for this page.
    pub input_tokens: u32,
    /// Completion tokens billed for this page.
    pub output_tokens: u32,
    /// Wall-clock time of the API exchange.
    pub duration_ms: u64,
}

/// Timing and token totals for a completed run.
///
/// All pages succeeded by construction — a page failure aborts the run
/// before stats exist — so there is no failed-page counter here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Pages in the source document (equals pages transcribed).
    pub total_pages: usize,
    /// Tokens sent across all pages.
    pub total_input_tokens: u64,
    /// Tokens received across all pages.
    pub total_output_tokens: u64,
    /// Time spent splitting the source PDF.
    pub split_duration_ms: u64,
    /// Time spent in API exchanges, summed across pages.
    pub api_duration_ms: u64,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}

/// The result of a successful run: the assembled report plus per-page detail.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    /// The full report text, exactly as written by
    /// [`crate::run_to_file`]: each page's text preceded by its marker,
    /// ascending page order.
    pub report: String,
    /// Per-page transcriptions in ascending page order.
    pub pages: Vec<PageTranscription>,
    /// Run statistics.
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_format() {
        assert_eq!(page_marker(1), "--- Page 1 ---");
        assert_eq!(page_marker(42), "--- Page 42 ---");
    }

    #[test]
    fn stats_default_is_zeroed() {
        let s = RunStats::default();
        assert_eq!(s.total_pages, 0);
        assert_eq!(s.total_input_tokens, 0);
    }
}
