//! Prompts sent with every transcription request.
//!
//! Centralising the prompts here serves two purposes:
//!
//! 1. **Single source of truth** — tightening a transcription rule requires
//!    editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompts directly without
//!    calling a real API.
//!
//! Callers can override the system prompt via
//! [`crate::config::OcrConfig::system_prompt`]; the constants here are used
//! only when no override is provided.

/// Default system prompt instructing the model to act as an OCR engine.
///
/// Used when `OcrConfig::system_prompt` is `None`.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an OCR system specialized in accurately extracting text from PDF documents.
Follow these rules strictly:
1. Always transcribe the exact text seen in the document in its original language
2. Preserve the layout, structure, and formatting of the text as much as possible
3. Include all headers, footnotes, and page numbers
4. NEVER translate or summarize the content
5. NEVER describe what you see - extract the actual text
6. Maintain any special characters, diacritics, and symbols exactly as they appear
7. Use Markdown formatting to help preserve structure where appropriate"#;

/// User-turn instruction attached to each page's document payload.
///
/// The document block carries the page itself; this text tells the model
/// what to do with it. Sent verbatim with every page.
pub const PAGE_PROMPT: &str = "Extract ALL text from this PDF page in its original language. \
Do not translate or describe the content - extract the exact text as it appears with proper \
formatting. Be thorough and capture everything visible on the page.";
