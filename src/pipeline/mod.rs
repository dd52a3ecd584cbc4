//! Pipeline stages for PDF splitting and transcription.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different splitting backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ split ──▶ encode ──▶ transcribe
//! (path)    (lopdf)   (base64)   (Messages API)
//! ```
//!
//! 1. [`input`]      — validate the user-supplied path and PDF magic bytes
//! 2. [`split`]      — write one single-page PDF per source page; runs in
//!    `spawn_blocking` because lopdf is synchronous and CPU-bound
//! 3. [`encode`]     — base64-wrap page bytes for the multimodal request body
//! 4. [`transcribe`] — issue one blocking API call per page; the only stage
//!    with network I/O

pub mod encode;
pub mod input;
pub mod split;
pub mod transcribe;
