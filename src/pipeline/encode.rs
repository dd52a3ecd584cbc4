//! Payload encoding: page-file bytes → base64 `DocumentData`.
//!
//! The Messages API accepts PDF pages as base64 data embedded in the JSON
//! request body. The page is sent as a `document` block rather than a
//! rasterised image: the model receives the page's actual text layer and
//! vector content, which transcribes small print more reliably than a
//! re-rendered bitmap would.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use tracing::debug;

/// Media type attached to every page payload.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A base64-encoded document ready for the API request body.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentData {
    /// MIME type of the encoded bytes; always [`PDF_MEDIA_TYPE`] here.
    pub media_type: String,
    /// Standard (padded) base64 of the page file's bytes.
    pub data: String,
}

/// Encode raw page-file bytes for the API request body.
pub fn encode_pdf_bytes(bytes: &[u8]) -> DocumentData {
    let data = STANDARD.encode(bytes);
    debug!("Encoded page → {} bytes base64", data.len());
    DocumentData {
        media_type: PDF_MEDIA_TYPE.to_string(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_round_trips() {
        let bytes = b"%PDF-1.5 fake page contents";
        let doc = encode_pdf_bytes(bytes);

        assert_eq!(doc.media_type, "application/pdf");
        let decoded = STANDARD.decode(&doc.data).expect("valid base64");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn encode_empty_is_empty() {
        let doc = encode_pdf_bytes(b"");
        assert!(doc.data.is_empty());
    }
}
