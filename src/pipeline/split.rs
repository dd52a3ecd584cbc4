//! PDF splitting: one single-page PDF per source page, via lopdf.
//!
//! The splitter clones the parsed document once per page and deletes every
//! other page from the clone. That is O(pages²) in object copies, but the
//! whole-run cost is dominated by the per-page API calls by two orders of
//! magnitude, so a smarter single-pass extraction is not worth its
//! complexity here.
//!
//! lopdf is synchronous and CPU-bound, so the public entry point offloads
//! the work with `tokio::task::spawn_blocking` to keep the async executor
//! responsive.

use crate::error::OcrError;
use lopdf::Document;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One single-page PDF produced by the splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    /// 1-indexed page number in the source document.
    pub page: usize,
    /// Path of the single-page PDF, `<page_dir>/page_<n>.pdf`.
    pub path: PathBuf,
}

/// Split `pdf_path` into single-page PDFs under `out_dir`.
///
/// Creates `out_dir` if absent. Returns the page files in ascending page
/// order; the mapping page number → file is a bijection with 1..=N.
///
/// # Errors
/// * [`OcrError::CorruptPdf`] — the source cannot be parsed
/// * [`OcrError::EmptyPdf`] — the source parses but has zero pages
/// * [`OcrError::PageDirFailed`] / [`OcrError::SplitFailed`] — I/O failures
pub async fn split_pages(pdf_path: &Path, out_dir: &Path) -> Result<Vec<PageFile>, OcrError> {
    let pdf_path = pdf_path.to_path_buf();
    let out_dir = out_dir.to_path_buf();

    tokio::task::spawn_blocking(move || split_blocking(&pdf_path, &out_dir))
        .await
        .map_err(|e| OcrError::Internal(format!("split task panicked: {e}")))?
}

fn split_blocking(pdf_path: &Path, out_dir: &Path) -> Result<Vec<PageFile>, OcrError> {
    let doc = Document::load(pdf_path).map_err(|e| OcrError::CorruptPdf {
        path: pdf_path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let total = doc.get_pages().len();
    if total == 0 {
        return Err(OcrError::EmptyPdf {
            path: pdf_path.to_path_buf(),
        });
    }

    std::fs::create_dir_all(out_dir).map_err(|e| OcrError::PageDirFailed {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    info!(
        "Splitting {} into {} single-page PDFs under {}",
        pdf_path.display(),
        total,
        out_dir.display()
    );

    let mut pages = Vec::with_capacity(total);
    for page in 1..=total {
        let path = out_dir.join(format!("page_{page}.pdf"));
        write_single_page(&doc, page, total, &path)?;
        debug!("Wrote page {page}/{total}: {}", path.display());
        pages.push(PageFile { page, path });
    }

    Ok(pages)
}

/// Write page `page` of `doc` as a standalone PDF at `path`.
fn write_single_page(
    doc: &Document,
    page: usize,
    total: usize,
    path: &Path,
) -> Result<(), OcrError> {
    let mut single = doc.clone();

    let others: Vec<u32> = (1..=total as u32)
        .filter(|&n| n != page as u32)
        .collect();
    if !others.is_empty() {
        single.delete_pages(&others);
    }

    // Dropping pages leaves their objects orphaned; prune and renumber so
    // the output file does not carry the entire source document.
    single.prune_objects();
    single.renumber_objects();

    single.save(path).map_err(|e| OcrError::SplitFailed {
        page,
        detail: e.to_string(),
    })?;

    Ok(())
}

// Splitter tests that need a real multi-page fixture live in
// tests/pipeline.rs, next to the shared fixture builder.
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn garbage_is_corrupt_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("garbage.pdf");
        std::fs::write(&src, b"%PDF-1.5 but nothing else").unwrap();

        let err = split_pages(&src, &dir.path().join("out")).await.unwrap_err();
        assert!(matches!(err, OcrError::CorruptPdf { .. }), "got {err:?}");
    }
}
