//! Configuration for an OCR run.
//!
//! All run behaviour is controlled through [`OcrConfig`], built via its
//! [`OcrConfigBuilder`]. Nothing in the pipeline reads ambient state: the
//! API key, the prompt, and the cleanup policy all travel in this struct, so
//! a test can substitute a mock transcriber and two runs can be diffed by
//! comparing their configs.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor breaks on every new field. The builder lets
//! callers set only what they care about and rely on documented defaults.

use crate::error::OcrError;
use crate::pipeline::transcribe::Transcriber;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default Anthropic model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-latest";

/// Default per-page completion budget.
///
/// A dense scanned page rarely exceeds 3 000 output tokens; 4 000 leaves
/// headroom without letting a hallucinating model run away.
pub const DEFAULT_MAX_TOKENS: usize = 4000;

/// Configuration for a PDF OCR run.
///
/// Built via [`OcrConfig::builder()`] or [`OcrConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_ocr::OcrConfig;
///
/// let config = OcrConfig::builder()
///     .api_key("sk-ant-...")
///     .model("claude-3-7-sonnet-latest")
///     .page_dir("split_pdfs")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct OcrConfig {
    /// Anthropic API key. If `None`, the run falls back to the
    /// `ANTHROPIC_API_KEY` environment variable; if that is unset too, the
    /// run fails with [`OcrError::MissingApiKey`] before touching any file.
    pub api_key: Option<String>,

    /// Model identifier sent with every request. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Maximum tokens the model may generate per page. Default: 4000.
    ///
    /// Setting this too low silently truncates the transcription
    /// mid-sentence; the API does not signal truncation as an error.
    pub max_tokens: usize,

    /// Custom system prompt. If `None`, uses
    /// [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Base URL of the Messages API. Default:
    /// [`crate::pipeline::transcribe::ANTHROPIC_API_BASE`]. Overridable so
    /// tests can point at a local stub server.
    pub api_base: String,

    /// Per-request timeout in seconds. Default: 120.
    ///
    /// OCR of a dense page can take well over a minute; a timeout surfaces
    /// as a [`OcrError::Network`] failure and aborts the run.
    pub api_timeout_secs: u64,

    /// Directory receiving the single-page PDFs. Default: `split_pdfs`.
    /// Created if absent.
    pub page_dir: PathBuf,

    /// Keep the single-page PDFs after transcription. Default: true.
    ///
    /// When false, each page file is deleted as soon as its transcription
    /// succeeds. Page files for untranscribed pages survive a failed run
    /// either way, which makes post-mortems possible.
    pub keep_page_files: bool,

    /// Pre-constructed transcriber. Takes precedence over `api_key`; the
    /// seam tests use to inject a mock instead of the live API.
    pub transcriber: Option<Arc<dyn Transcriber>>,

    /// Optional progress callback, invoked per page.
    pub progress: Option<ProgressCallback>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: None,
            api_base: crate::pipeline::transcribe::ANTHROPIC_API_BASE.to_string(),
            api_timeout_secs: 120,
            page_dir: PathBuf::from("split_pdfs"),
            keep_page_files: true,
            transcriber: None,
            progress: None,
        }
    }
}

impl fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt", &self.system_prompt.as_deref().map(|_| "<custom>"))
            .field("api_base", &self.api_base)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("page_dir", &self.page_dir)
            .field("keep_page_files", &self.keep_page_files)
            .field("transcriber", &self.transcriber.as_ref().map(|_| "<dyn Transcriber>"))
            .finish()
    }
}

impl OcrConfig {
    /// Create a new builder for `OcrConfig`.
    pub fn builder() -> OcrConfigBuilder {
        OcrConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`OcrConfig`].
#[derive(Debug)]
pub struct OcrConfigBuilder {
    config: OcrConfig,
}

impl OcrConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn page_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.page_dir = dir.into();
        self
    }

    pub fn keep_page_files(mut self, keep: bool) -> Self {
        self.config.keep_page_files = keep;
        self
    }

    pub fn transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.config.transcriber = Some(transcriber);
        self
    }

    pub fn progress(mut self, callback: ProgressCallback) -> Self {
        self.config.progress = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<OcrConfig, OcrError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(OcrError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.api_timeout_secs == 0 {
            return Err(OcrError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(OcrError::InvalidConfig("model must not be empty".into()));
        }
        Ok(self.config)
    }
}
