use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// Placeholder the transcription tooling emits when it could not find a video title
pub const SENTINEL_TITLE: &str = "Transcribed Video";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub video_reference: String,
    pub wants_improved_text: bool,
}

impl TranscriptionRequest {
    pub fn new(video_reference: impl Into<String>, wants_improved_text: bool) -> Self {
        Self {
            video_reference: video_reference.into(),
            wants_improved_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptionResult {
    /// `None` when no real title could be extracted
    pub title: Option<String>,
    #[serde(rename = "original")]
    pub original_text: String,
    #[serde(rename = "improved")]
    pub improved_text: Option<String>,
}

impl TranscriptionResult {
    /// Builds a result, folding blank titles and the tooling's placeholder title into `None`.
    pub fn new(
        title: Option<String>,
        original_text: impl Into<String>,
        improved_text: Option<String>,
    ) -> Self {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && t != SENTINEL_TITLE);

        Self {
            title,
            original_text: original_text.into(),
            improved_text,
        }
    }

    /// Improved text when the tooling produced it, the raw transcript otherwise
    pub fn best_text(&self) -> &str {
        self.improved_text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.original_text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizationRequest {
    pub text: String,
    pub max_length: u32,
    min_length: Option<u32>,
}

impl SummarizationRequest {
    /// Divisor applied to `max_length` when no explicit minimum is supplied
    pub const MIN_LENGTH_DIVISOR: u32 = 4;

    pub fn new(text: impl Into<String>, max_length: u32) -> Self {
        Self {
            text: text.into(),
            max_length,
            min_length: None,
        }
    }

    pub fn with_min_length(mut self, min_length: u32) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn min_length(&self) -> u32 {
        self.min_length
            .unwrap_or(self.max_length / Self::MIN_LENGTH_DIVISOR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarizationResult {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// A self-contained image reference: mime type plus the payload, no follow-up fetch needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub payload: Vec<u8>,
}

impl DataUrl {
    pub fn new(mime_type: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload,
        }
    }

    pub fn encoded_payload(&self) -> String {
        BASE64.encode(&self.payload)
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.encoded_payload())
    }
}

impl Serialize for DataUrl {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageResult {
    #[serde(rename = "imageUrl")]
    pub image: DataUrl,
}

/// Raw JSON object emitted by the transcription tooling on success
#[derive(Debug, Deserialize)]
pub(crate) struct ScriptOutput {
    #[serde(default)]
    pub title: Option<String>,
    pub original: String,
    #[serde(default)]
    pub improved: Option<String>,
}

/// `{ "error": "..." }` payload found on stderr or in remote error bodies
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub error: serde_json::Value,
}

impl ErrorPayload {
    pub fn message(&self) -> String {
        match &self.error {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_title_becomes_none() {
        let result = TranscriptionResult::new(Some(SENTINEL_TITLE.into()), "text", None);
        assert_eq!(result.title, None);

        let result = TranscriptionResult::new(Some("   ".into()), "text", None);
        assert_eq!(result.title, None);

        let result = TranscriptionResult::new(Some(" Rust in 100s ".into()), "text", None);
        assert_eq!(result.title.as_deref(), Some("Rust in 100s"));
    }

    #[test]
    fn test_best_text_prefers_improved() {
        let result = TranscriptionResult::new(None, "raw", Some("polished".into()));
        assert_eq!(result.best_text(), "polished");

        let result = TranscriptionResult::new(None, "raw", Some("".into()));
        assert_eq!(result.best_text(), "raw");
    }

    #[test]
    fn test_min_length_defaults_to_quarter_of_max() {
        assert_eq!(SummarizationRequest::new("t", 100).min_length(), 25);
        assert_eq!(SummarizationRequest::new("t", 130).min_length(), 32);
        assert_eq!(SummarizationRequest::new("t", 3).min_length(), 0);
        assert_eq!(
            SummarizationRequest::new("t", 100)
                .with_min_length(40)
                .min_length(),
            40
        );
    }

    #[test]
    fn test_data_url_format() {
        let url = DataUrl::new("image/png", vec![0x89, b'P', b'N', b'G']);
        assert_eq!(url.to_string(), "data:image/png;base64,iVBORw==");
        assert_eq!(
            serde_json::to_value(&url).unwrap(),
            serde_json::json!("data:image/png;base64,iVBORw==")
        );
    }

    #[test]
    fn test_error_payload_message() {
        let payload: ErrorPayload = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(payload.message(), "boom");

        let payload: ErrorPayload = serde_json::from_str(r#"{"error":["a","b"]}"#).unwrap();
        assert_eq!(payload.message(), r#"["a","b"]"#);
    }
}
