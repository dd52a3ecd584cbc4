//! Progress-callback trait for per-page transcription events.
//!
//! Inject an [`Arc<dyn RunProgress>`] via
//! [`crate::config::OcrConfigBuilder::progress`] to receive events as the
//! pipeline works through the document. The pipeline is strictly sequential,
//! so events for page N+1 never arrive before page N has completed, but the
//! trait is still `Send + Sync` because the run executes on a tokio runtime.
//!
//! Callbacks were chosen over channels as the least-invasive integration
//! point: the CLI forwards events to an indicatif bar, a host application
//! could forward them to a WebSocket or a database record, and the library
//! knows nothing about either.

use std::sync::Arc;

/// Called by the pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. There is no error event: the first page failure
/// aborts the run and surfaces as the `Err` returned by [`crate::run`].
pub trait RunProgress: Send + Sync {
    /// Called once after the splitter has produced the page files.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages that will be transcribed
    fn on_split_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before the API request is sent for a page.
    fn on_page_start(&self, page: usize, total_pages: usize) {
        let _ = (page, total_pages);
    }

    /// Called when a page has been transcribed.
    ///
    /// # Arguments
    /// * `text_len` — byte length of the transcribed text
    fn on_page_complete(&self, page: usize, total_pages: usize, text_len: usize) {
        let _ = (page, total_pages, text_len);
    }

    /// Called once after the last page, before the report is assembled.
    /// Not called when the run aborts on an error.
    fn on_run_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// Convenience alias for the shared callback handle stored in the config.
pub type ProgressCallback = Arc<dyn RunProgress>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        completed: AtomicUsize,
    }

    impl RunProgress for Counting {
        fn on_page_complete(&self, _page: usize, _total: usize, _len: usize) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn default_methods_are_noops() {
        let cb = Counting {
            completed: AtomicUsize::new(0),
        };
        cb.on_split_complete(3);
        cb.on_page_start(1, 3);
        cb.on_page_complete(1, 3, 42);
        assert_eq!(cb.completed.load(Ordering::SeqCst), 1);
    }
}
