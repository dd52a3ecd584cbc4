//! Error types for the pdf-ocr library.
//!
//! Every failure in this crate is fatal: the run stops at the first error and
//! nothing is salvaged. There is deliberately no retry or per-page error
//! accumulation — each page blocks the pipeline, and a page that cannot be
//! transcribed aborts the whole document.
//!
//! [`OcrError::kind`] classifies each variant into a coarse group so callers
//! (and tests) can branch on *what went wrong* without matching every
//! variant: configuration, input, transcription, output, or internal.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of an [`OcrError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The run could not start: missing API key or invalid configuration.
    Config,
    /// The source PDF is missing, unreadable, or not a parseable PDF.
    Input,
    /// The OCR API returned an error, a malformed body, or was unreachable.
    Transcription,
    /// The result file could not be written.
    Output,
    /// Unexpected failure inside the pipeline itself (e.g. a panicked
    /// blocking task); not attributable to config, input, or the API.
    Internal,
}

/// All errors returned by the pdf-ocr library.
#[derive(Debug, Error)]
pub enum OcrError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// No API key was supplied and `ANTHROPIC_API_KEY` is not set.
    #[error(
        "ANTHROPIC_API_KEY is not set.\n\
         Export it before running: export ANTHROPIC_API_KEY=sk-ant-..."
    )]
    MissingApiKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// The PDF parsed but contains no pages; there is nothing to transcribe.
    #[error("PDF '{path}' has no pages")]
    EmptyPdf { path: PathBuf },

    /// Writing one of the single-page PDFs failed.
    #[error("Failed to write single-page PDF for page {page}: {detail}")]
    SplitFailed { page: usize, detail: String },

    /// The split output directory could not be created.
    #[error("Failed to create page directory '{path}': {source}")]
    PageDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A previously written page file could not be read back.
    #[error("Failed to read page file '{path}': {source}")]
    PageReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Transcription errors ──────────────────────────────────────────────
    /// The OCR API answered with a non-success HTTP status.
    #[error("OCR API returned HTTP {status} for page {page}: {detail}")]
    ApiStatus {
        page: usize,
        status: u16,
        detail: String,
    },

    /// The OCR API answered 2xx but the body was not the expected shape.
    #[error("Malformed OCR API response for page {page}: {detail}")]
    MalformedResponse { page: usize, detail: String },

    /// The request never completed: DNS, TLS, connect, or timeout failure.
    #[error("Network failure while transcribing page {page}: {source}")]
    Network {
        page: usize,
        #[source]
        source: reqwest::Error,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the result file.
    #[error("Failed to write result file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a panicked blocking task).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OcrError {
    /// Classify this error into its coarse failure group.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OcrError::MissingApiKey | OcrError::InvalidConfig(_) => ErrorKind::Config,
            OcrError::FileNotFound { .. }
            | OcrError::PermissionDenied { .. }
            | OcrError::NotAPdf { .. }
            | OcrError::CorruptPdf { .. }
            | OcrError::EmptyPdf { .. }
            | OcrError::SplitFailed { .. }
            | OcrError::PageDirFailed { .. }
            | OcrError::PageReadFailed { .. } => ErrorKind::Input,
            OcrError::ApiStatus { .. }
            | OcrError::MalformedResponse { .. }
            | OcrError::Network { .. } => ErrorKind::Transcription,
            OcrError::OutputWriteFailed { .. } => ErrorKind::Output,
            OcrError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_display() {
        let e = OcrError::MissingApiKey;
        assert!(e.to_string().contains("ANTHROPIC_API_KEY"));
        assert_eq!(e.kind(), ErrorKind::Config);
    }

    #[test]
    fn api_status_display() {
        let e = OcrError::ApiStatus {
            page: 2,
            status: 429,
            detail: "rate_limit_error: too many requests".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("429"), "got: {msg}");
        assert!(msg.contains("page 2"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::Transcription);
    }

    #[test]
    fn not_a_pdf_display() {
        let e = OcrError::NotAPdf {
            path: PathBuf::from("/tmp/notes.txt"),
            magic: *b"hell",
        };
        assert!(e.to_string().contains("notes.txt"));
        assert_eq!(e.kind(), ErrorKind::Input);
    }

    #[test]
    fn empty_pdf_display() {
        let e = OcrError::EmptyPdf {
            path: PathBuf::from("blank.pdf"),
        };
        assert!(e.to_string().contains("no pages"));
        assert_eq!(e.kind(), ErrorKind::Input);
    }

    #[test]
    fn internal_has_its_own_kind() {
        let e = OcrError::Internal("split task panicked".into());
        assert_eq!(e.kind(), ErrorKind::Internal);
        assert!(e.to_string().contains("panicked"));
    }

    #[test]
    fn split_failed_display() {
        let e = OcrError::SplitFailed {
            page: 7,
            detail: "disk full".into(),
        };
        assert!(e.to_string().contains("page 7"));
        assert_eq!(e.kind(), ErrorKind::Input);
    }
}
