use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    llm::{image::ImageSynthesizer, summarizer::SummaryModel},
    types::{DataUrl, ErrorPayload, ImageRequest, ImageResult},
};

/// Client for the Hugging Face hosted inference API.
///
/// One instance talks to one token. Summarization and image generation are usually
/// billed to different tokens, so the binary builds two clients.
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    client: Client,
    api_key: String,
    base_url: String,
    summarization_model: String,
    image_model: String,
    image_timeout: Duration,
}

impl HuggingFaceClient {
    pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
    pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(60);
    const DEFAULT_IMAGE_MIME: &str = "image/png";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            summarization_model: <Self as SummaryModel>::SUMMARIZER_MODEL.into(),
            image_model: <Self as ImageSynthesizer>::IMAGE_MODEL.into(),
            image_timeout: Self::DEFAULT_IMAGE_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_summarization_model(mut self, model: impl Into<String>) -> Self {
        self.summarization_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    pub fn image_timeout(&self) -> Duration {
        self.image_timeout
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    #[tracing::instrument(skip(self, chunk), fields(chunk_len = chunk.len()))]
    pub async fn send_summarization_request(
        &self,
        chunk: &str,
        min_length: u32,
        max_length: u32,
    ) -> Result<Value> {
        let body = serde_json::json!({
            "inputs": chunk,
            "parameters": {
                "min_length": min_length,
                "max_length": max_length,
            }
        });

        let resp = self
            .client
            .post(self.model_url(&self.summarization_model))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(api_error(status, &bytes));
        }

        serde_json::from_slice::<Value>(&bytes).map_err(|e| {
            Error::service(
                Some(status.as_u16()),
                format!("Summarization response is not valid JSON: {e}"),
            )
        })
    }

    #[tracing::instrument(skip(self), fields(timeout_secs = self.image_timeout.as_secs()))]
    pub async fn send_image_request(&self, prompt: &str) -> Result<(Option<String>, Vec<u8>)> {
        let resp = self
            .client
            .post(self.model_url(&self.image_model))
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, Self::DEFAULT_IMAGE_MIME)
            .json(&serde_json::json!({ "inputs": prompt }))
            .timeout(self.image_timeout)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(api_error(status, &bytes));
        }

        Ok((content_type, bytes.to_vec()))
    }
}

/// Pulls a non-empty `summary_text` out of either `[{"summary_text": ...}]` or `{"summary_text": ...}`.
pub fn extract_summary_text(response: &Value) -> Option<&str> {
    let entry = match response {
        Value::Array(items) => items.first()?,
        Value::Object(_) => response,
        _ => return None,
    };
    entry
        .get("summary_text")?
        .as_str()
        .filter(|text| !text.is_empty())
}

/// Builds an error from a failed response body.
///
/// Bodies arrive as raw bytes even for errors: a UTF-8 JSON `{"error": ...}` yields its
/// message, any other JSON is reported whole and anything else is reported as an opaque
/// payload instead of being dropped.
pub fn api_error(status: StatusCode, body: &[u8]) -> Error {
    let decoded = std::str::from_utf8(body)
        .ok()
        .and_then(|text| serde_json::from_str::<Value>(text).ok());

    let message = match decoded {
        Some(json) => match serde_json::from_value::<ErrorPayload>(json.clone()) {
            Ok(payload) => payload.message(),
            Err(_) => json.to_string(),
        },
        None => {
            tracing::error!(status = status.as_u16(), body_len = body.len(), "Undecodable error body");
            let raw = String::from_utf8_lossy(body);
            let raw = raw.trim();
            if raw.is_empty() {
                format!("API error: {status} (empty body)")
            } else {
                format!("API error: {status} - raw payload ({} bytes): {raw}", body.len())
            }
        }
    };

    Error::service(Some(status.as_u16()), message)
}

impl SummaryModel for HuggingFaceClient {
    const SUMMARIZER_MODEL: &'static str = "facebook/bart-large-cnn";

    async fn summarize_chunk(&self, chunk: &str, min_length: u32, max_length: u32) -> Result<String> {
        let response = self
            .send_summarization_request(chunk, min_length, max_length)
            .await?;

        extract_summary_text(&response)
            .map(str::to_string)
            .ok_or_else(|| {
                tracing::error!(response = %response, "Unrecognized summarization response");
                Error::service(None, "Failed to get summary from Hugging Face API")
            })
    }
}

impl ImageSynthesizer for HuggingFaceClient {
    const IMAGE_MODEL: &'static str = "stabilityai/stable-diffusion-xl-base-1.0";

    async fn synthesize(&self, request: &ImageRequest) -> Result<ImageResult> {
        if request.prompt.trim().is_empty() {
            return Err(Error::invalid_input("prompt is required"));
        }

        let (content_type, payload) = self.send_image_request(&request.prompt).await?;
        if payload.is_empty() {
            return Err(Error::service(None, "Image response carried no payload"));
        }

        let mime_type = content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .filter(|ct| ct.starts_with("image/"))
            .unwrap_or(Self::DEFAULT_IMAGE_MIME);

        tracing::info!(mime_type, bytes = payload.len(), "Generated image");

        Ok(ImageResult {
            image: DataUrl::new(mime_type, payload),
        })
    }
}
