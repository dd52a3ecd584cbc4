//! Transcription: one Anthropic Messages API call per page.
//!
//! The [`Transcriber`] trait is the crate's only seam to the outside world.
//! The pipeline holds it as `Arc<dyn Transcriber>`, so tests swap in a mock
//! and never touch the network; production uses [`ClaudeTranscriber`].
//!
//! There is deliberately no retry or backoff here: a failed page aborts the
//! run, and the error carries the HTTP status and the API's own error
//! message so the user can decide whether to re-run.

use crate::config::OcrConfig;
use crate::error::OcrError;
use crate::pipeline::encode::DocumentData;
use crate::prompts::{DEFAULT_SYSTEM_PROMPT, PAGE_PROMPT};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Production endpoint of the Messages API.
pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";

/// API version header required on every request.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const MESSAGES_PATH: &str = "/v1/messages";

/// Text and token usage returned for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Turns one encoded page into its transcription.
///
/// Implementations must be `Send + Sync`; the pipeline shares them behind an
/// `Arc`. Errors are fatal for the whole run.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a single page. `page` is the 1-indexed page number, used
    /// only for error reporting.
    async fn transcribe_page(
        &self,
        page: usize,
        document: DocumentData,
    ) -> Result<Transcription, OcrError>;
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Document { source: DocumentSource<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct DocumentSource<'a> {
    #[serde(rename = "type")]
    source_type: &'a str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Default)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

// ── Live implementation ──────────────────────────────────────────────────

/// [`Transcriber`] backed by the Anthropic Messages API over HTTPS.
pub struct ClaudeTranscriber {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: usize,
    system_prompt: String,
}

impl ClaudeTranscriber {
    /// Build a transcriber from an explicit API key and the run config.
    ///
    /// The per-request timeout lives on the reqwest client, so a hung
    /// connection surfaces as an [`OcrError::Network`] failure rather than
    /// blocking the run forever.
    pub fn new(api_key: impl Into<String>, config: &OcrConfig) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| OcrError::Internal(format!("failed to build HTTP client: {e}")))?;

        let endpoint = format!(
            "{}{}",
            config.api_base.trim_end_matches('/'),
            MESSAGES_PATH
        );

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        })
    }

    fn build_request<'a>(&'a self, document: &'a DocumentData) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: &self.system_prompt,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Document {
                        source: DocumentSource {
                            source_type: "base64",
                            media_type: &document.media_type,
                            data: &document.data,
                        },
                    },
                    ContentBlock::Text { text: PAGE_PROMPT },
                ],
            }],
        }
    }
}

#[async_trait]
impl Transcriber for ClaudeTranscriber {
    async fn transcribe_page(
        &self,
        page: usize,
        document: DocumentData,
    ) -> Result<Transcription, OcrError> {
        let request = self.build_request(&document);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::Network { page, source: e })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The API wraps errors in {"error": {"type", "message"}}; fall
            // back to the raw body when it doesn't.
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| format!("{}: {}", b.error.kind, b.error.message))
                .unwrap_or(body);
            return Err(OcrError::ApiStatus {
                page,
                status: status.as_u16(),
                detail,
            });
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| OcrError::MalformedResponse {
                page,
                detail: e.to_string(),
            })?;

        let text = extract_text(page, &body)?;

        debug!(
            "Page {page}: {} input tokens, {} output tokens",
            body.usage.input_tokens, body.usage.output_tokens
        );

        Ok(Transcription {
            text,
            input_tokens: body.usage.input_tokens,
            output_tokens: body.usage.output_tokens,
        })
    }
}

/// Join the response's text blocks in order.
///
/// Fails only when no `text`-type block is present at all. A text block
/// whose content is empty is a valid transcription of a blank page and
/// passes through as the empty string.
fn extract_text(page: usize, body: &MessagesResponse) -> Result<String, OcrError> {
    let texts: Vec<&str> = body
        .content
        .iter()
        .filter_map(|b| match b {
            ResponseBlock::Text { text } => Some(text.as_str()),
            ResponseBlock::Other => None,
        })
        .collect();

    if texts.is_empty() {
        return Err(OcrError::MalformedResponse {
            page,
            detail: "response contained no text block".into(),
        });
    }

    Ok(texts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::encode_pdf_bytes;

    #[test]
    fn request_serialises_to_messages_shape() {
        let config = OcrConfig::builder().model("claude-3-7-sonnet-latest").build().unwrap();
        let t = ClaudeTranscriber::new("sk-ant-test", &config).unwrap();
        let document = encode_pdf_bytes(b"%PDF-1.5 page");

        let json = serde_json::to_value(t.build_request(&document)).unwrap();

        assert_eq!(json["model"], "claude-3-7-sonnet-latest");
        assert_eq!(json["max_tokens"], 4000);
        assert_eq!(json["messages"][0]["role"], "user");

        let blocks = json["messages"][0]["content"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["type"], "document");
        assert_eq!(blocks[0]["source"]["type"], "base64");
        assert_eq!(blocks[0]["source"]["media_type"], "application/pdf");
        assert_eq!(blocks[1]["type"], "text");
        assert_eq!(blocks[1]["text"], PAGE_PROMPT);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = OcrConfig::builder()
            .api_base("http://localhost:8080/")
            .build()
            .unwrap();
        let t = ClaudeTranscriber::new("k", &config).unwrap();
        assert_eq!(t.endpoint, "http://localhost:8080/v1/messages");
    }

    #[test]
    fn response_text_blocks_are_extracted() {
        let raw = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "First line"},
                {"type": "tool_use", "id": "x", "name": "n", "input": {}},
                {"type": "text", "text": "Second line"}
            ],
            "usage": {"input_tokens": 1200, "output_tokens": 340}
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();

        let text = extract_text(1, &parsed).unwrap();
        assert_eq!(text, "First line\nSecond line");
        assert_eq!(parsed.usage.input_tokens, 1200);
        assert_eq!(parsed.usage.output_tokens, 340);
    }

    #[test]
    fn response_without_text_block_is_malformed() {
        let raw = r#"{
            "content": [{"type": "tool_use", "id": "x", "name": "n", "input": {}}]
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();

        let err = extract_text(2, &parsed).unwrap_err();
        match err {
            OcrError::MalformedResponse { page, detail } => {
                assert_eq!(page, 2);
                assert!(detail.contains("no text block"), "got: {detail}");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn empty_content_is_malformed() {
        let raw = r#"{"content": []}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert!(extract_text(1, &parsed).is_err());
    }

    #[test]
    fn blank_page_transcription_is_accepted() {
        // An empty text block is a valid transcription of a blank page,
        // not a protocol error.
        let raw = r#"{"content": [{"type": "text", "text": ""}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(1, &parsed).unwrap(), "");
    }

    #[test]
    fn missing_usage_defaults_to_zero() {
        let raw = r#"{"content": [{"type": "text", "text": "hi"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.usage.input_tokens, 0);
    }

    #[test]
    fn api_error_body_is_parsed() {
        let raw = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error.kind, "authentication_error");
        assert!(parsed.error.message.contains("invalid"));
    }

    #[test]
    fn custom_system_prompt_is_used() {
        let config = OcrConfig::builder()
            .system_prompt("Transcribe only the footnotes.")
            .build()
            .unwrap();
        let t = ClaudeTranscriber::new("k", &config).unwrap();
        assert_eq!(t.system_prompt, "Transcribe only the footnotes.");
    }
}
